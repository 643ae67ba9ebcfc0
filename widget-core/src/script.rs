//! Contracts for externally executed content: script widgets and live clocks.
//!
//! The engine never runs scripts or timers. It stores script text and
//! refresh intervals and tells a host scheduler what needs refreshing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::Document;
use crate::element::{ElementId, ElementKind};

/// Refresh interval for clocks that show seconds.
pub const SECONDS_CLOCK_REFRESH_SEC: u32 = 1;
/// Refresh interval for clocks without seconds.
pub const MINUTES_CLOCK_REFRESH_SEC: u32 = 60;

/// Typed result of running a widget script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScriptOutput {
    /// A single line of text.
    Text {
        /// Text to display.
        value: String,
    },
    /// A list of rows.
    List {
        /// Rows, top to bottom.
        items: Vec<String>,
    },
    /// A shape description.
    Shape {
        /// Shape name, e.g. `ring` or `bar`.
        shape: String,
        /// Fill color as hex.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
        /// Fill ratio in `0.0..=1.0` for progress-like shapes.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        progress: Option<f32>,
    },
}

/// Failure reported by a script runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// The script did not compile or threw.
    #[error("Script failed: {0}")]
    Execution(String),

    /// The script exceeded its time budget.
    #[error("Script timed out after {0} ms")]
    Timeout(u64),

    /// The script returned a value that is not a valid output.
    #[error("Invalid script output: {0}")]
    InvalidOutput(String),
}

/// Sandboxed executor for widget scripts, provided by the host.
pub trait ScriptRuntime {
    /// Run `script` once and return its output.
    ///
    /// # Errors
    ///
    /// Returns a [`ScriptError`] if execution fails.
    fn run(&self, script: &str) -> Result<ScriptOutput, ScriptError>;
}

/// What a refresh target needs re-evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RefreshKind {
    /// Re-run the element's script.
    Script,
    /// Redraw a clock.
    Clock,
}

/// An element that needs periodic refreshing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTarget {
    /// Element to refresh.
    pub id: ElementId,
    /// Why it refreshes.
    pub kind: RefreshKind,
    /// Interval in seconds, at least one.
    pub interval_sec: u32,
}

impl Document {
    /// Elements that need a periodic refresh, in paint order.
    ///
    /// Hidden elements are skipped. Schedulers should diff this list after
    /// every change and cancel timers for ids that disappeared.
    #[must_use]
    pub fn refresh_targets(&self) -> Vec<RefreshTarget> {
        self.flattened_ids()
            .into_iter()
            .filter_map(|id| self.element(id))
            .filter(|element| element.visible)
            .filter_map(|element| {
                let (kind, interval_sec) = match &element.kind {
                    ElementKind::ScriptWidget { refresh_sec, .. } => {
                        (RefreshKind::Script, (*refresh_sec).max(1))
                    }
                    ElementKind::AnalogClock { clock } | ElementKind::DigitalClock { clock } => {
                        let interval = if clock.show_seconds {
                            SECONDS_CLOCK_REFRESH_SEC
                        } else {
                            MINUTES_CLOCK_REFRESH_SEC
                        };
                        (RefreshKind::Clock, interval)
                    }
                    _ => return None,
                };
                Some(RefreshTarget {
                    id: element.id,
                    kind,
                    interval_sec,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::document::CanvasSize;
    use crate::element::Element;
    use crate::payload::ClockConfig;

    struct EchoRuntime;

    impl ScriptRuntime for EchoRuntime {
        fn run(&self, script: &str) -> Result<ScriptOutput, ScriptError> {
            if script.is_empty() {
                return Err(ScriptError::Execution("empty script".to_string()));
            }
            Ok(ScriptOutput::Text {
                value: script.to_string(),
            })
        }
    }

    fn document_of(elements: Vec<Element>) -> Document {
        let order = elements.iter().map(|e| e.id).collect();
        let map: BTreeMap<_, _> = elements.into_iter().map(|e| (e.id, e)).collect();
        Document::from_parts(map, order, CanvasSize::default()).expect("valid")
    }

    #[test]
    fn test_refresh_targets() {
        let script = Element::new(ElementKind::ScriptWidget {
            script: "return 1".to_string(),
            refresh_sec: 30,
        });
        let clock = Element::new(ElementKind::DigitalClock {
            clock: ClockConfig {
                show_seconds: true,
                ..ClockConfig::default()
            },
        });
        let analog = Element::new(ElementKind::AnalogClock {
            clock: ClockConfig::default(),
        });
        let rect = Element::new(ElementKind::Rectangle);
        let ids = [script.id, clock.id, analog.id];
        let document = document_of(vec![script, rect, clock, analog]);

        let targets = document.refresh_targets();
        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0].id, ids[0]);
        assert_eq!(targets[0].kind, RefreshKind::Script);
        assert_eq!(targets[0].interval_sec, 30);
        assert_eq!(targets[1].id, ids[1]);
        assert_eq!(targets[1].interval_sec, SECONDS_CLOCK_REFRESH_SEC);
        assert_eq!(targets[2].interval_sec, MINUTES_CLOCK_REFRESH_SEC);
    }

    #[test]
    fn test_hidden_elements_not_refreshed() {
        let mut script = Element::new(ElementKind::ScriptWidget {
            script: String::new(),
            refresh_sec: 0,
        });
        script.visible = false;
        let document = document_of(vec![script]);
        assert!(document.refresh_targets().is_empty());
    }

    #[test]
    fn test_zero_interval_floors_to_one() {
        let script = Element::new(ElementKind::ScriptWidget {
            script: String::new(),
            refresh_sec: 0,
        });
        let document = document_of(vec![script]);
        assert_eq!(document.refresh_targets()[0].interval_sec, 1);
    }

    #[test]
    fn test_runtime_contract() {
        let runtime = EchoRuntime;
        assert_eq!(
            runtime.run("hi"),
            Ok(ScriptOutput::Text {
                value: "hi".to_string()
            })
        );
        assert!(runtime.run("").is_err());
    }

    #[test]
    fn test_output_wire_format() {
        let output: ScriptOutput =
            serde_json::from_str(r#"{"type":"list","items":["a","b"]}"#).expect("parse");
        assert_eq!(
            output,
            ScriptOutput::List {
                items: vec!["a".to_string(), "b".to_string()]
            }
        );
    }
}
