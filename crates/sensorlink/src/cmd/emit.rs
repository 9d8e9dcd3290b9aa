use std::io::Write;

use sensorlink_frame::FrameWriter;
use sensorlink_message::{tag, MessageBuilder, MAX_BODY};

use crate::cmd::EmitArgs;
use crate::exit::{frame_error, message_error, CliError, CliResult, SUCCESS, USAGE};

pub fn run(args: EmitArgs) -> CliResult<i32> {
    let client = parse_id(&args.client, "--client")?;
    let readings = args
        .reading
        .iter()
        .map(|spec| parse_reading(spec))
        .collect::<CliResult<Vec<_>>>()?;

    let link = open_link(&args)?;
    emit_frames(link, &client, &readings, args.seq, args.count)?;

    Ok(SUCCESS)
}

/// Writes `count` framed transmissions, incrementing the sequence number.
fn emit_frames<W: Write>(
    link: W,
    client: &[u8],
    readings: &[(Vec<u8>, i32)],
    first_seq: u32,
    count: u32,
) -> CliResult<()> {
    let mut writer = FrameWriter::new(link);
    let mut builder = MessageBuilder::new();

    for offset in 0..count {
        let seq = first_seq.wrapping_add(offset);

        builder.clear();
        builder
            .append(tag::CLIENT_ID, client)
            .map_err(|err| message_error("building transmission", err))?;
        builder
            .append_u32(tag::SEQNUM, seq)
            .map_err(|err| message_error("building transmission", err))?;
        for (sensor, value) in readings {
            builder
                .append(tag::SENSOR_ID, sensor)
                .map_err(|err| message_error("building transmission", err))?;
            builder
                .append_u32(tag::SENSOR_VALUE, *value as u32)
                .map_err(|err| message_error("building transmission", err))?;
        }

        writer
            .send(builder.as_bytes())
            .map_err(|err| frame_error("emit failed", err))?;
    }

    Ok(())
}

/// Parses a hex identity, bounded by what one sub-message body can carry.
fn parse_id(input: &str, flag: &str) -> CliResult<Vec<u8>> {
    let bytes = hex::decode(input)
        .map_err(|err| CliError::new(USAGE, format!("{flag} is not valid hex: {err}")))?;
    if bytes.is_empty() {
        return Err(CliError::new(USAGE, format!("{flag} must not be empty")));
    }
    if bytes.len() > MAX_BODY {
        return Err(CliError::new(
            USAGE,
            format!(
                "{flag} is {} bytes; identities on the wire are capped at {MAX_BODY}",
                bytes.len()
            ),
        ));
    }
    Ok(bytes)
}

/// Parses one `HEXID:VALUE` reading spec. Values are signed decimal.
fn parse_reading(spec: &str) -> CliResult<(Vec<u8>, i32)> {
    let (id, value) = spec.split_once(':').ok_or_else(|| {
        CliError::new(
            USAGE,
            format!("--reading must look like HEXID:VALUE, got {spec:?}"),
        )
    })?;

    let sensor = parse_id(id, "--reading sensor id")?;
    let value: i32 = value
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid reading value: {value:?}")))?;

    Ok((sensor, value))
}

fn open_link(args: &EmitArgs) -> CliResult<Box<dyn Write>> {
    if args.device.as_os_str() == "-" {
        return Ok(Box::new(std::io::stdout()));
    }
    open_serial_link(args)
}

#[cfg(unix)]
fn open_serial_link(args: &EmitArgs) -> CliResult<Box<dyn Write>> {
    let link = sensorlink_transport::open_serial(&args.device, args.baud)
        .map_err(|err| crate::exit::link_error("open failed", err))?;
    Ok(Box::new(link))
}

#[cfg(not(unix))]
fn open_serial_link(_args: &EmitArgs) -> CliResult<Box<dyn Write>> {
    Err(CliError::new(
        USAGE,
        "serial devices are only supported on unix; emit frames to \"-\" instead",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_decodes_hex() {
        assert_eq!(parse_id("6e6f6465", "--client").unwrap(), b"node");
    }

    #[test]
    fn parse_id_rejects_bad_hex_and_bad_widths() {
        assert!(parse_id("zz", "--client").is_err());
        assert!(parse_id("", "--client").is_err());
        // 16 bytes fits the registry but not a sub-message body.
        assert!(parse_id(&"ab".repeat(16), "--client").is_err());
        assert!(parse_id(&"ab".repeat(15), "--client").is_ok());
    }

    #[test]
    fn parse_reading_splits_id_and_value() {
        let (sensor, value) = parse_reading("74656d70:21").unwrap();
        assert_eq!(sensor, b"temp");
        assert_eq!(value, 21);
    }

    #[test]
    fn parse_reading_accepts_negative_values() {
        let (_, value) = parse_reading("74656d70:-40").unwrap();
        assert_eq!(value, -40);
    }

    #[test]
    fn parse_reading_rejects_malformed_specs() {
        assert!(parse_reading("74656d70").is_err());
        assert!(parse_reading("74656d70:abc").is_err());
        assert!(parse_reading("zz:1").is_err());
    }

    #[test]
    fn emitted_frames_roundtrip_through_the_hub() {
        use sensorlink_hub::HubSession;

        let mut wire = Vec::new();
        emit_frames(
            &mut wire,
            b"node-1",
            &[(b"temp".to_vec(), -7)],
            5,
            3,
        )
        .unwrap();

        let mut session = HubSession::new(std::io::Cursor::new(wire));
        for _ in 0..3 {
            session.next_frame().unwrap();
        }

        let client = session.registry().get(b"node-1").unwrap();
        assert_eq!(client.last_seqnum(), Some(7));
        assert_eq!(client.packet_loss(), 0);
        assert_eq!(client.sensor(b"temp").unwrap().value(), -7);
    }

    #[test]
    fn sequence_numbers_wrap_instead_of_panicking() {
        use sensorlink_hub::HubSession;

        let mut wire = Vec::new();
        emit_frames(&mut wire, b"node-1", &[], u32::MAX, 2).unwrap();

        let mut session = HubSession::new(std::io::Cursor::new(wire));
        session.next_frame().unwrap();
        session.next_frame().unwrap();

        let client = session.registry().get(b"node-1").unwrap();
        assert_eq!(client.last_seqnum(), Some(0));
    }
}
