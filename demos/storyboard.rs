//! Storyboard example — walks every genre plus the prompt fallback.
//!
//! Each piece is revealed on a fast cadence and printed as it grows, then a
//! second request interrupts a first one to show supersession.
//!
//! Run with: cargo run --example storyboard

use std::io::Write;
use std::sync::Arc;

use creative_writer::core::clipboard::MemoryClipboard;
use creative_writer::core::config::StudioConfig;
use creative_writer::core::notify::TracingNotifier;
use creative_writer::core::reveal::RevealOutcome;
use creative_writer::{GenreTag, StudioError, WritingStudio};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), StudioError> {
    let mut studio = WritingStudio::builder()
        .config(StudioConfig {
            word_delay_ms: 15,
            ..StudioConfig::default()
        })
        .with_clipboard(MemoryClipboard::default())
        .with_notifier(Arc::new(TracingNotifier))
        .prompt("A mysterious letter arrives at midnight...")
        .build()?;

    let lineup = GenreTag::ALL.into_iter().map(Some).chain([None]);
    for genre in lineup {
        studio.select_genre(genre);
        println!(
            "=== {} ===",
            genre.map(|g| g.display_name()).unwrap_or("No genre")
        );
        reveal_live(&mut studio).await?;
        println!("\n");
    }

    // --- Supersession: start fantasy, switch to mystery mid-reveal ---
    println!("=== Interrupted ===");
    studio.select_genre(Some(GenreTag::Fantasy));
    let first = studio.submit()?;
    tokio::time::sleep(studio.config().word_delay() * 5).await;
    println!("before switch: {}", studio.revealed_text());

    studio.select_genre(Some(GenreTag::Mystery));
    let second = studio.submit()?;
    let first = studio.await_reveal(first).await?;
    let second = studio.await_reveal(second).await?;
    assert_eq!(first, RevealOutcome::Superseded);
    assert_eq!(second, RevealOutcome::Completed);
    println!("after switch:  {}", studio.revealed_text());

    Ok(())
}

async fn reveal_live(studio: &mut WritingStudio) -> Result<(), StudioError> {
    let mut rx = studio.subscribe();
    let handle = studio.submit()?;
    rx.borrow_and_update();

    let mut shown = 0;
    let done = studio.await_reveal(handle);
    tokio::pin!(done);
    let outcome = loop {
        tokio::select! {
            outcome = &mut done => break outcome,
            Ok(()) = rx.changed() => {
                let text = rx.borrow_and_update().revealed_text.clone();
                if let Some(fresh) = text.get(shown..) {
                    print!("{}", fresh);
                    std::io::stdout().flush().ok();
                }
                shown = text.len();
            }
        }
    };
    if let Some(fresh) = rx.borrow().revealed_text.get(shown..) {
        print!("{}", fresh);
    }
    outcome.map(|_| ())
}
