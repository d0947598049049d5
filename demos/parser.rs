use json_event_stream::{AsyncJsonDecoder, ChannelReader, DecoderConfig, StreamError};
use serde::Deserialize;
use tokio::sync::mpsc;

#[derive(Debug, Deserialize)]
struct ThoughtChunk {
    step: u32,
    thought: String,
    action: String,
}

async fn simulate_stream() -> ChannelReader {
    let (tx, reader) = ChannelReader::channel(10);

    tokio::spawn(async move {
        let chunks = vec![
            r#"{"step":1,"thought":"Initial"#,
            r#"izing","action":"Start process"}"#,
            r#"{"step":2,"thought":"Analyzing input","action":"Fe"#,
            r#"tch data"} {"step":3,"#,
            r#""thought":"Processing","action":"Transform"}"#,
        ];

        for chunk in chunks {
            if tx.send(chunk.as_bytes().to_vec().into()).await.is_err() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    });

    reader
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let reader = simulate_stream().await;
    let mut decoder = AsyncJsonDecoder::with_config(
        reader,
        DecoderConfig {
            buffer_size: 16,
            ..Default::default()
        },
    );

    loop {
        match decoder.next::<ThoughtChunk>().await {
            Ok(thought) => {
                println!("[Step {}] {}", thought.step, thought.thought);
                println!("Action: {}\n", thought.action);
            }
            Err(StreamError::EndOfStream) => break,
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }

    // The synchronous decoder takes bytes directly.
    let (tx, mut rx) = mpsc::channel::<&'static [u8]>(4);
    tokio::spawn(async move {
        for part in [&b"[1, 2"[..], b", 3] {\"done\"", b": [\"yes\"]} 99"] {
            let _ = tx.send(part).await;
        }
    });
    let mut sync_decoder = json_event_stream::Decoder::new();
    while let Some(part) = rx.recv().await {
        sync_decoder.feed(part)?;
        for value in sync_decoder.drain() {
            println!("Decoded {}", value.to_json_string()?);
        }
    }
    sync_decoder.finish()?;
    for value in sync_decoder.drain() {
        println!("Decoded at end of input {}", value.to_json_string()?);
    }
    Ok(())
}
