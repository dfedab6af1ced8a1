use std::io;

use clap::Parser;
use itch4::{
    decode::{DynReader, RecordDecoder},
    encode::Encoder,
};
use itch4_cli::{output_from_args, Args};

const STDIN_SENTINEL: &str = "-";

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.input.as_os_str() == STDIN_SENTINEL {
        let decoder = RecordDecoder::new(DynReader::inferred_with_buffer(io::stdin().lock())?);
        encode(decoder, &args)
    } else {
        let decoder = RecordDecoder::new(DynReader::from_file(&args.input)?);
        encode(decoder, &args)
    }
}

fn encode<R: io::Read>(mut decoder: RecordDecoder<R>, args: &Args) -> anyhow::Result<()> {
    let writer = output_from_args(args)?;
    let mut encoder = Encoder::new(writer);
    let mut count = 0;
    let res = loop {
        match decoder.decode_record() {
            Ok(Some(record)) => {
                if let Err(e) = encoder.encode_record_ref(&record) {
                    break Err(e);
                }
                count += 1;
                if args.limit.is_some_and(|limit| count >= limit.get()) {
                    break Ok(());
                }
            }
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        }
    };
    // Records fully encoded before any failure stay in the output.
    let flush_res = encoder.flush();
    match res.and(flush_res) {
        // Handle broken pipe as a non-error.
        Err(itch4::Error::Io { source, .. }) if source.kind() == io::ErrorKind::BrokenPipe => {
            Ok(())
        }
        res => Ok(res?),
    }
}
