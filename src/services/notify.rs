use anyhow::{anyhow, bail, Result};
use serde_json::json;
use tracing::{debug, warn};

use crate::config;
use crate::database::models::{Feedback, Painting};
use crate::database::{DatabaseManager, FeedbackStore, PaintingStore};

/// Send the Telegram message for a stored feedback.
///
/// Runs detached from the submitting request: failures are logged and
/// dropped, never surfaced to the visitor.
pub async fn send_feedback_notification(feedback_id: i32) {
    if let Err(e) = try_send(feedback_id).await {
        warn!("Feedback notification for {} not delivered: {}", feedback_id, e);
    }
}

async fn try_send(feedback_id: i32) -> Result<()> {
    let telegram = &config::config().telegram;
    let (Some(bot_token), Some(chat_id)) = (&telegram.bot_token, &telegram.chat_id) else {
        debug!("Telegram notifications not configured; skipping feedback {}", feedback_id);
        return Ok(());
    };

    // Re-read committed state rather than trusting the submitting request
    let pool = DatabaseManager::pool().await?;
    let feedback = FeedbackStore::new(pool.clone())
        .get(feedback_id)
        .await?
        .ok_or_else(|| anyhow!("feedback {} disappeared before notification", feedback_id))?;
    let painting = PaintingStore::new(pool)
        .get(feedback.painting_id)
        .await?
        .ok_or_else(|| anyhow!("painting {} disappeared before notification", feedback.painting_id))?;

    let url = format!("https://api.telegram.org/bot{}/sendMessage", bot_token);
    let response = reqwest::Client::new()
        .post(&url)
        .timeout(std::time::Duration::from_secs(10))
        .json(&json!({
            "chat_id": chat_id,
            "text": enquiry_text(&painting, &feedback),
        }))
        .send()
        .await?;

    if !response.status().is_success() {
        bail!("Telegram API returned {}", response.status());
    }

    debug!("Feedback notification for {} delivered", feedback_id);
    Ok(())
}

fn enquiry_text(painting: &Painting, feedback: &Feedback) -> String {
    format!(
        "New purchase enquiry!\nPainting: \"{}\" (#{})\nName: {}\nPhone: {}",
        painting.title, painting.id, feedback.user_name, feedback.phone_number
    )
}
