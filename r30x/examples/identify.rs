//! Identification example: capture once and search the library
//!
//! Usage: R30X_PORT=/dev/ttyUSB0 cargo run --example identify

use std::time::Duration;

use r30x::{CharBuffer, ExtractOutcome, ImageOutcome, SearchOutcome, Sensor, TemplateCountOutcome};
use tokio::time::sleep;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let port = std::env::var("R30X_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    let mut sensor = Sensor::serial(port);
    sensor.initialize().await?;

    if let TemplateCountOutcome::Count(count) = sensor.template_count().await? {
        println!("Library holds {} templates", count);
    }

    println!("Place finger on the sensor...");
    while sensor.capture_image().await? != ImageOutcome::Success {
        sleep(Duration::from_millis(100)).await;
    }

    if sensor.image_to_buffer(CharBuffer::One).await? != ExtractOutcome::Success {
        println!("Image too poor, try again");
        return Ok(());
    }

    match sensor.search(CharBuffer::One, 0, 1000).await? {
        SearchOutcome::Found(found) => {
            println!("✓ Matched page {} (score {})", found.page, found.score)
        }
        SearchOutcome::NotFound => println!("✗ No match"),
        other => println!("Search failed: {:?}", other),
    }

    sensor.close().await?;
    Ok(())
}
