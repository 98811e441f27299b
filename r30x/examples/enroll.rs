//! Enrollment example: two captures of the same finger stored at one page
//!
//! Usage: R30X_PORT=/dev/ttyUSB0 cargo run --example enroll -- <page>

use std::time::Duration;

use anyhow::{Context, bail};
use r30x::{CharBuffer, ExtractOutcome, ImageOutcome, MergeOutcome, SaveOutcome, Sensor};
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("R30X_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());
    let page: u16 = std::env::args()
        .nth(1)
        .context("usage: enroll <page>")?
        .parse()
        .context("page must be a number")?;

    let mut sensor = Sensor::serial(port);
    sensor.initialize().await?;

    for buffer in [CharBuffer::One, CharBuffer::Two] {
        println!("Place finger on the sensor...");
        wait_for_finger(&mut sensor).await?;

        match sensor.image_to_buffer(buffer).await? {
            ExtractOutcome::Success => println!("✓ Features stored in buffer {}", u8::from(buffer)),
            other => bail!("Could not extract features: {:?}", other),
        }

        println!("Lift finger");
        sleep(Duration::from_secs(1)).await;
    }

    match sensor.merge_buffers_to_model().await? {
        MergeOutcome::Success => println!("✓ Template created"),
        other => bail!("Could not merge: {:?}", other),
    }

    match sensor.save_template(CharBuffer::One, page).await? {
        SaveOutcome::Success => println!("✓ Stored at page {}", page),
        other => bail!("Could not store: {:?}", other),
    }

    sensor.close().await?;
    Ok(())
}

async fn wait_for_finger(sensor: &mut Sensor) -> anyhow::Result<()> {
    loop {
        match sensor.capture_image().await? {
            ImageOutcome::Success => return Ok(()),
            ImageOutcome::NoFinger => sleep(Duration::from_millis(100)).await,
            other => println!("Capture failed ({:?}), try again", other),
        }
    }
}
