use applicant_audit::error::AppError;
use applicant_audit::remote::wire::{
    self, RemoteAttribute, ValidationVerdict, MAX_FRAME_LEN, STATUS_OK,
};
use clap::Args;
use std::io::ErrorKind;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

#[derive(Args, Debug)]
pub(crate) struct EconStubArgs {
    /// Port to listen on
    #[arg(long, default_value_t = 5001)]
    pub(crate) port: u16,
    /// Attribute to flag in every verdict (repeatable), by wire name
    #[arg(long = "flag", value_parser = parse_attribute)]
    pub(crate) flagged: Vec<RemoteAttribute>,
}

fn parse_attribute(raw: &str) -> Result<RemoteAttribute, String> {
    RemoteAttribute::from_wire_name(raw)
        .ok_or_else(|| format!("unknown validation attribute '{raw}'"))
}

/// Serve canned verdicts over the validation wire protocol. Every request
/// gets the same answer: clean except for the attributes named on the
/// command line.
pub(crate) async fn run_econ_stub(args: EconStubArgs) -> Result<(), AppError> {
    let mut verdict = ValidationVerdict::clean();
    for attribute in &args.flagged {
        verdict.set(*attribute, true);
    }

    let listener = TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!(port = args.port, flagged = args.flagged.len(), "econ stub listening");

    loop {
        let (stream, peer) = listener.accept().await?;
        let verdict = verdict.clone();
        tokio::spawn(async move {
            if let Err(err) = serve_connection(stream, &verdict).await {
                warn!(%peer, %err, "econ stub connection ended with error");
            }
        });
    }
}

async fn serve_connection(
    mut stream: TcpStream,
    verdict: &ValidationVerdict,
) -> Result<(), std::io::Error> {
    loop {
        let mut len_bytes = [0u8; 4];
        match stream.read_exact(&mut len_bytes).await {
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => return Ok(()),
            Err(err) => return Err(err),
        }

        let len = u32::from_be_bytes(len_bytes) as usize;
        if len > MAX_FRAME_LEN {
            return Err(std::io::Error::new(
                ErrorKind::InvalidData,
                format!("oversized frame of {len} bytes"),
            ));
        }

        let mut body = vec![0u8; len];
        stream.read_exact(&mut body).await?;

        match wire::decode_request(&body) {
            Ok(request) => {
                info!(
                    reference = request.reference(RemoteAttribute::Passport),
                    "econ stub answering"
                );
                let frame = wire::encode_response(STATUS_OK, verdict);
                stream.write_all(&frame).await?;
            }
            Err(err) => {
                return Err(std::io::Error::new(
                    ErrorKind::InvalidData,
                    format!("undecodable request: {err}"),
                ));
            }
        }
    }
}
