//! Record a demonstration to disk, then load it as a training buffer.
//!
//! Demonstrates: DemoWriter → .demo file → demo_to_buffer → chunk access.

use std::fs::File;

use mimic::prelude::*;
use mimic_bench::reference_profile;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Mimic Record and Load Example ===\n");

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("expert.demo");
    let (params, steps) = reference_profile(42);

    // --- Record ---
    let mut writer = DemoWriter::new(File::create(&path)?, "expert")?;
    writer.write_parameters(&params)?;
    for step in &steps {
        writer.write_step(step)?;
    }
    println!(
        "Recorded {} steps in {} episodes to {}",
        writer.steps_written(),
        writer.episodes_written(),
        path.display()
    );
    writer.finish()?;

    // --- Load ---
    let config = DemoConfig {
        sequence_length: 32,
        ..DemoConfig::default()
    };
    let (loaded, buffer) = demo_to_buffer(&path, &config)?;
    println!("Brain: {}", loaded.brain_name);
    println!(
        "Buffer: {} transitions, {} episodes, {} sequences",
        buffer.len(),
        buffer.episode_count(),
        buffer.sequences().len()
    );
    for key in buffer.keys() {
        let entries = buffer.column(key).map_or(0, Column::len);
        println!("  {:<12} {entries} entries", key.to_string());
    }

    if let Some(chunk) = buffer.chunk(0) {
        let seq = chunk.sequence();
        println!(
            "\nFirst chunk: transitions {}..{} of episode {}",
            seq.start,
            seq.start + seq.len,
            seq.episode
        );
    }

    println!("\n=== Done ===");
    Ok(())
}
