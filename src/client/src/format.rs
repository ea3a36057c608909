//! Wire payload encodings for outbound notifications.

use serde::Serialize;

use conhook_common::types::hook::BodyFormat;
use conhook_common::types::reaction::Reaction;

pub trait PayloadFormatter: Send + Sync {
    fn content_type(&self) -> &'static str;
    fn body(&self, reaction: &Reaction) -> anyhow::Result<Vec<u8>>;
}

/// Formatter for a hook's configured body format, or `None` when the format
/// has no wire encoding.
pub fn for_body_format(format: BodyFormat) -> Option<&'static dyn PayloadFormatter> {
    match format {
        BodyFormat::Json => Some(&JsonFormatter),
        BodyFormat::SlackJson => Some(&SlackFormatter),
        BodyFormat::None => None,
    }
}

/// Serializes the full reaction envelope.
pub struct JsonFormatter;

impl PayloadFormatter for JsonFormatter {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn body(&self, reaction: &Reaction) -> anyhow::Result<Vec<u8>> {
        Ok(serde_json::to_vec(reaction)?)
    }
}

/// Builds a Slack attachment message instead of the raw envelope.
pub struct SlackFormatter;

impl PayloadFormatter for SlackFormatter {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn body(&self, reaction: &Reaction) -> anyhow::Result<Vec<u8>> {
        let headline = format!(
            "Container {} on {} for {:?}",
            reaction.container.state, reaction.host.hostname, reaction.hook.name
        );

        let message = SlackMessage {
            attachments: vec![SlackAttachment {
                fallback: format!(
                    "{} on {}",
                    reaction.container.name, reaction.host.hostname
                ),
                pretext: headline.clone(),
                markdown_in: vec!["pretext".to_string()],
                color: "#394D54".to_string(),
                title: headline,
                timestamp: reaction.timestamp,
                fields: vec![
                    SlackField {
                        title: "Host".to_string(),
                        value: reaction.host.hostname.clone(),
                        short: true,
                    },
                    SlackField {
                        title: "State".to_string(),
                        value: reaction.container.state.to_string(),
                        short: true,
                    },
                    SlackField {
                        title: "Container".to_string(),
                        value: reaction.container.name.clone(),
                        short: false,
                    },
                    SlackField {
                        title: "Image".to_string(),
                        value: reaction.container.image_name.clone(),
                        short: reaction.container.image_name.len() > 20,
                    },
                ],
            }],
        };

        Ok(serde_json::to_vec(&message)?)
    }
}

#[derive(Serialize)]
struct SlackMessage {
    attachments: Vec<SlackAttachment>,
}

#[derive(Serialize)]
struct SlackAttachment {
    fallback: String,
    pretext: String,
    color: String,
    title: String,
    #[serde(rename = "mrkdwn_in")]
    markdown_in: Vec<String>,
    fields: Vec<SlackField>,
    #[serde(rename = "ts")]
    timestamp: i64,
}

#[derive(Serialize)]
struct SlackField {
    title: String,
    value: String,
    short: bool,
}
