//! # Member Selection
//!
//! Picks the post for a role: either the caller's explicit choice, or the
//! lightest pipe whose bending check passes.
//!
//! ```text
//! override? ──yes──→ normalize_label ──Key──→ that record
//!     │                    └──Unknown──→ diagnostic ─┐
//!     no                                             │
//!     └─────────────→ ordered pipes, first passing ←─┘
//!                        └── none pass → largest + diagnostic
//! ```

use serde::{Deserialize, Serialize};

use crate::checks::check_bending;
use crate::errors::{CalcError, CalcResult};
use crate::posts::{LabelResolution, PostCatalog, PostRecord};
use crate::settings::Settings;

/// Footing used when a record has no footing data (non-strict mode)
pub const FALLBACK_FOOTING_IN: (f64, f64) = (12.0, 30.0);

/// A caller-supplied member choice.
///
/// Only constructed through [`MemberOverride::parse`], so "no override" is
/// always `None` and never an empty or placeholder string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberOverride(String);

impl MemberOverride {
    /// Normalize raw input. Empty text and the placeholders `auto` and
    /// `recommended` (any case) mean auto-select.
    pub fn parse(raw: Option<&str>) -> Option<MemberOverride> {
        let text = raw?.trim();
        if text.is_empty() || text.eq_ignore_ascii_case("auto") || text.eq_ignore_ascii_case("recommended") {
            return None;
        }
        Some(MemberOverride(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Selected post with its footing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub post_key: String,
    pub post_label: String,
    pub footing_diameter_in: f64,
    pub embedment_in: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionSource {
    /// Caller named the member
    Explicit,
    /// First ordered pipe that passes bending
    Auto,
    /// No pipe passes; largest returned
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub recommendation: Recommendation,
    pub source: SelectionSource,
    pub diagnostics: Vec<String>,
}

/// Chooses members from an injected catalog.
#[derive(Debug, Clone, Copy)]
pub struct MemberSelector<'a> {
    catalog: &'a PostCatalog,
    settings: &'a Settings,
}

impl<'a> MemberSelector<'a> {
    pub fn new(catalog: &'a PostCatalog, settings: &'a Settings) -> Self {
        MemberSelector { catalog, settings }
    }

    /// Select a member for `load_per_post_lb` at `height_ft`.
    ///
    /// Always returns a recommendation unless strict footing mode rejects a
    /// record without footing data, or the catalog has no pipes to search.
    pub fn select(
        &self,
        load_per_post_lb: f64,
        height_ft: f64,
        member: Option<&MemberOverride>,
    ) -> CalcResult<Selection> {
        let mut diagnostics = Vec::new();

        if let Some(member) = member {
            match self.catalog.normalize_label(member.as_str()) {
                LabelResolution::Key(key) => {
                    let record = self.catalog.lookup(&key)?;
                    let recommendation = self.recommendation_for(record, &mut diagnostics)?;
                    return Ok(Selection {
                        recommendation,
                        source: SelectionSource::Explicit,
                        diagnostics,
                    });
                }
                LabelResolution::Unknown(label) => {
                    tracing::warn!(label = %label, "unknown post label, auto-selecting");
                    diagnostics.push(format!("Unknown post label '{}', falling back to auto selection.", label));
                }
            }
        }

        for key in self.catalog.ordered_pipe_keys() {
            let Some(record) = self.catalog.get(key) else {
                continue;
            };
            if check_bending(record, height_ft, load_per_post_lb).ok {
                let recommendation = self.recommendation_for(record, &mut diagnostics)?;
                return Ok(Selection {
                    recommendation,
                    source: SelectionSource::Auto,
                    diagnostics,
                });
            }
        }

        let largest = self
            .catalog
            .largest_pipe()
            .ok_or_else(|| CalcError::post_not_found("<ordered pipes>"))?;
        tracing::warn!(
            load_per_post_lb,
            height_ft,
            post_key = %largest.key,
            "no standard pipe post has adequate bending capacity; recommending largest"
        );
        diagnostics.push(format!(
            "No standard pipe post has adequate bending capacity for {:.0} lb at {:.1} ft; recommending largest available ({}).",
            load_per_post_lb, height_ft, largest.key
        ));
        let recommendation = self.recommendation_for(largest, &mut diagnostics)?;
        Ok(Selection {
            recommendation,
            source: SelectionSource::Fallback,
            diagnostics,
        })
    }

    /// Recommendation for a known record, applying the footing-data policy.
    pub fn recommendation_for(&self, record: &PostRecord, diagnostics: &mut Vec<String>) -> CalcResult<Recommendation> {
        let (footing_diameter_in, embedment_in) = match record.footing_defaults_in() {
            Some(footing) => footing,
            None if self.settings.strict_footing => {
                return Err(CalcError::missing_footing_data(&record.key));
            }
            None => {
                diagnostics.push(format!(
                    "Footing data missing for post_key={}; using conservative default footing {} in dia x {} in embedment.",
                    record.key, FALLBACK_FOOTING_IN.0, FALLBACK_FOOTING_IN.1
                ));
                FALLBACK_FOOTING_IN
            }
        };

        Ok(Recommendation {
            post_key: record.key.clone(),
            post_label: record.label.clone(),
            footing_diameter_in,
            embedment_in,
        })
    }
}
