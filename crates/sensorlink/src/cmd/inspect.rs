use std::io::Read;

use bytes::BytesMut;

use sensorlink_frame::FrameDecoder;
use sensorlink_message::{messages, tag_name};

use crate::cmd::InspectArgs;
use crate::exit::{io_error, CliResult, SUCCESS};
use crate::output::{
    print_frame, print_inspect_summary, print_raw, MessageRow, OutputFormat,
};

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let capture = read_capture(&args)?;

    let mut decoder = FrameDecoder::new();
    let mut src = BytesMut::from(capture.as_slice());
    let mut index = 0u64;

    while let Some(payload) = decoder.decode(&mut src) {
        index += 1;

        if matches!(format, OutputFormat::Raw) {
            print_raw(&payload);
            continue;
        }

        let (rows, truncated) = walk_messages(&payload);
        print_frame(index, payload.len(), &rows, truncated, format);
    }

    // Bytes left mid-frame mean the capture was cut short, not corrupted.
    let trailing_partial = !decoder.is_scanning();
    print_inspect_summary(
        decoder.frames_decoded(),
        decoder.frames_rejected(),
        trailing_partial,
        format,
    );

    Ok(SUCCESS)
}

fn walk_messages(payload: &[u8]) -> (Vec<MessageRow>, bool) {
    let mut rows = Vec::new();
    let mut truncated = false;

    for message in messages(payload) {
        match message {
            Ok(message) => rows.push(MessageRow {
                tag: message.tag,
                name: tag_name(message.tag),
                body: hex::encode(message.body),
                value: message.as_u32().ok(),
            }),
            Err(_) => {
                truncated = true;
                break;
            }
        }
    }

    (rows, truncated)
}

fn read_capture(args: &InspectArgs) -> CliResult<Vec<u8>> {
    if args.path.as_os_str() == "-" {
        let mut capture = Vec::new();
        std::io::stdin()
            .read_to_end(&mut capture)
            .map_err(|err| io_error("reading stdin", err))?;
        return Ok(capture);
    }

    std::fs::read(&args.path)
        .map_err(|err| io_error(&format!("failed reading {}", args.path.display()), err))
}

#[cfg(test)]
mod tests {
    use super::*;

    use sensorlink_frame::encode_frame;
    use sensorlink_message::{tag, MessageBuilder};

    fn payload(client: &[u8], seq: u32) -> Vec<u8> {
        let mut builder = MessageBuilder::new();
        builder.append(tag::CLIENT_ID, client).unwrap();
        builder.append_u32(tag::SEQNUM, seq).unwrap();
        builder.as_bytes().to_vec()
    }

    #[test]
    fn walk_names_tags_and_decodes_values() {
        let (rows, truncated) = walk_messages(&payload(b"node-1", 42));

        assert!(!truncated);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "CLIENT_ID");
        assert_eq!(rows[0].body, hex::encode(b"node-1"));
        assert_eq!(rows[0].value, None);
        assert_eq!(rows[1].name, "SEQNUM");
        assert_eq!(rows[1].value, Some(42));
    }

    #[test]
    fn walk_flags_truncated_tails_and_keeps_prior_rows() {
        let mut bytes = payload(b"node-1", 1);
        bytes.push(0x3A); // SENSOR_VALUE header declaring 10 absent bytes

        let (rows, truncated) = walk_messages(&bytes);

        assert!(truncated);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn decoder_counts_survive_a_noisy_capture() {
        let mut capture = vec![0x00, 0x80, 0x55]; // leading noise
        let mut framed = BytesMut::new();
        encode_frame(&payload(b"node-1", 1), &mut framed).unwrap();
        capture.extend_from_slice(&framed);

        let mut corrupt = framed.to_vec();
        let last = corrupt.len() - 1;
        corrupt[last] ^= 0xFF;
        capture.extend_from_slice(&corrupt);

        let mut decoder = FrameDecoder::new();
        let mut src = BytesMut::from(capture.as_slice());
        let mut frames = 0;
        while decoder.decode(&mut src).is_some() {
            frames += 1;
        }

        assert_eq!(frames, 1);
        assert_eq!(decoder.frames_rejected(), 1);
        assert!(decoder.is_scanning());
    }
}
