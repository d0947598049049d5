use json_event_stream::{EventRelay, JsonValue};
use tokio::time::{sleep, Duration};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let server = EventRelay::new();
    server.on("chat", |args: &[JsonValue]| {
        let user = args.first().and_then(JsonValue::as_str).unwrap_or("?");
        let message = args.get(1).and_then(JsonValue::as_str).unwrap_or("");
        println!("[server] {} says: {}", user, message);
    });
    let (addr, _accept) = server.listen("127.0.0.1:0").await?;
    println!("Server listening on {}", addr);

    let client = EventRelay::new();
    client.on("ack", |args: &[JsonValue]| {
        println!("[client] ack for message #{:?}", args.first().and_then(JsonValue::as_f64));
    });
    client.connect("127.0.0.1", addr.port()).await?;

    while server.peer_count() == 0 {
        sleep(Duration::from_millis(5)).await;
    }

    for (i, text) in ["hello", "how are you?", "bye"].into_iter().enumerate() {
        client.emit("chat", vec!["alice".into(), text.into()]).await;
        server.emit("ack", vec![JsonValue::from(i as i64 + 1)]).await;
    }

    sleep(Duration::from_millis(100)).await;
    Ok(())
}
