use chat_client::{ApiResult, ChatClient, MessagePayload, Value};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let client = ChatClient::from_env();
    println!("chat api client demo");
    println!("endpoint: {}", client.config().base_url);

    println!("\n1. canned example data:");
    report(client.send_test_message().await);

    println!("\n2. custom message:");
    let payload = MessagePayload::new(
        "Hello from Rust!",
        "general",
        "rust_user",
        "@everyone",
        chrono::Local::now().to_rfc3339(),
    );
    report(client.send_payload(&payload).await);

    println!("\n3. empty fields:");
    report(client.send_message("", "", "", "", "").await);
}

fn report(result: ApiResult<Value>) {
    match result {
        Ok(value) => match sonic_rs::to_string(&value) {
            Ok(body) => println!("success: {body}"),
            Err(err) => println!("success, but response failed to re-serialize: {err}"),
        },
        Err(err) => println!("failed: {err}"),
    }
}
