//! Thread assembly: the one-call-per-export orchestrator.
//!
//! Pipeline: settle lazy content, snapshot and locate message nodes, then per
//! node detect role/timestamp and convert to blocks. A node that fails to
//! convert or converts to nothing is skipped; the rest of the document is
//! unaffected. Only the total conditions (unparseable snapshot, nothing
//! located, nothing converted) surface as errors, and the request wrapper
//! flattens even those to an empty answer.

use chrono::{SecondsFormat, Utc};
use url::Url;

use crate::convert;
use crate::detect;
use crate::error::ExportError;
use crate::ir::nodes::{Message, Thread, ThreadMeta};
use crate::ir::render::render_thread;
use crate::locate::{self, Matcher};
use crate::messages::ExportRequest;
use crate::options::ConversionOptions;
use crate::page::ThreadPage;
use crate::settle::{self, SettleConfig};

/// Tunables of one assembly run.
#[derive(Debug, Clone, Default)]
pub struct AssembleConfig {
    pub settle: SettleConfig,
    pub matchers: Vec<Matcher>,
}

impl AssembleConfig {
    fn effective_matchers(&self) -> Vec<Matcher> {
        if self.matchers.is_empty() {
            locate::default_matchers()
        } else {
            self.matchers.clone()
        }
    }
}

/// Assemble the thread with default settle/matcher configuration.
pub fn assemble(
    page: &mut dyn ThreadPage,
    options: &ConversionOptions,
) -> Result<String, ExportError> {
    assemble_with_config(page, options, &AssembleConfig::default())
}

/// Assemble the thread into one Markdown document.
pub fn assemble_with_config(
    page: &mut dyn ThreadPage,
    options: &ConversionOptions,
    config: &AssembleConfig,
) -> Result<String, ExportError> {
    settle::settle(page, &config.settle);

    let dom = page.snapshot()?;
    let located = locate::locate_messages(&dom, &config.effective_matchers());
    if located.is_empty() {
        return Err(ExportError::NoMessages);
    }

    let mut messages = Vec::new();
    for entry in &located {
        match convert::convert_message(&entry.node, options) {
            Ok(body) if body.is_empty() => {
                tracing::debug!(key = %entry.key, "skipping message with empty body");
            }
            Ok(body) => {
                let role = detect::detect_role(&entry.node);
                let timestamp = if options.include_timestamps {
                    detect::detect_timestamp(&entry.node)
                } else {
                    None
                };
                messages.push(Message {
                    role,
                    timestamp,
                    body,
                });
            }
            Err(e) => {
                tracing::warn!(key = %entry.key, error = %e, "skipping unconvertible message");
            }
        }
    }
    if messages.is_empty() {
        return Err(ExportError::NoMessages);
    }

    let meta = options.include_meta.then(|| ThreadMeta {
        title: options.include_title.clone().filter(|t| !t.is_empty()),
        source_url: page
            .url()
            .and_then(|u| Url::parse(u).ok())
            .map(|u| u.to_string()),
        exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    });

    Ok(render_thread(&Thread { meta, messages }, options))
}

/// Answer an export request: the Markdown document, or empty on any failure.
pub fn handle_export_request(page: &mut dyn ThreadPage, request: &ExportRequest) -> String {
    match assemble(page, &request.options) {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!(error = %e, "export produced nothing");
            String::new()
        }
    }
}
