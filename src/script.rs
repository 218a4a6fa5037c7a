//! Scripted interaction with a page
//!
//! A script is a YAML list of steps replayed against a [`Page`]:
//!
//! ```yaml
//! viewport: { width: 1024, height: 768 }
//! steps:
//!   - open: login-modal
//!   - click: "[data-dismiss=modal]"
//!   - key: Escape
//!   - advance_ms: 5000
//! ```

use crate::components::dialogs::DialogSnapshot;
use crate::config::Viewport;
use crate::dom::{Document, Selector};
use crate::error::UiResult;
use crate::page::Page;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    /// Viewport to resize to before the first step
    #[serde(default)]
    pub viewport: Option<Viewport>,
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Show a dialog by id
    Open(String),
    /// Hide a dialog by id
    Close(String),
    /// Click the first element matching a selector
    Click(String),
    /// Press a key on the document
    Key(String),
    Hover(String),
    Leave(String),
    /// Submit the first form matching a selector
    Submit(String),
    /// Type into the first element matching a selector
    Fill { selector: String, value: String },
    Resize {
        width: u32,
        #[serde(default)]
        height: Option<u32>,
    },
    AdvanceMs(u64),
    /// Wire dialogs inserted since load
    InitModals,
}

/// What a step did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepResult {
    pub step: usize,
    /// Listeners run; `None` when the step dispatched nothing
    pub invoked: Option<usize>,
    pub default_prevented: bool,
    /// The selector matched nothing and the step was skipped
    pub skipped: bool,
}

/// Final state of a page after a run
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub dialogs: Vec<DialogSnapshot>,
    pub cart: Vec<String>,
    pub listeners: usize,
    pub invocations: u64,
    pub elapsed_ms: u128,
}

impl PageReport {
    pub fn capture<D: Document>(page: &Page<D>) -> Self {
        Self {
            dialogs: page.dialogs(),
            cart: page.cart().outbox().to_vec(),
            listeners: page.listeners().len(),
            invocations: page.invocations(),
            elapsed_ms: page.now().as_millis(),
        }
    }
}

impl Script {
    pub fn from_yaml(source: &str) -> UiResult<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Replay every step. Fails only on a malformed selector.
    pub fn run<D: Document>(&self, page: &mut Page<D>) -> UiResult<Vec<StepResult>> {
        if let Some(viewport) = self.viewport {
            page.resize(viewport.width, viewport.height);
        }

        let mut results = Vec::with_capacity(self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            debug!("Step {}: {:?}", index, step);
            let mut result = StepResult {
                step: index,
                invoked: None,
                default_prevented: false,
                skipped: false,
            };

            let outcome = match step {
                Step::Open(id) => {
                    page.open_modal(id);
                    None
                }
                Step::Close(id) => {
                    page.close_modal(id);
                    None
                }
                Step::Key(key) => Some(page.key_down(key)),
                Step::Click(selector) => find(page, selector)?.map(|node| page.click(node)),
                Step::Hover(selector) => find(page, selector)?.map(|node| page.hover(node)),
                Step::Leave(selector) => find(page, selector)?.map(|node| page.leave(node)),
                Step::Submit(selector) => find(page, selector)?.map(|node| page.submit(node)),
                Step::Fill { selector, value } => {
                    if let Some(node) = find(page, selector)? {
                        page.document_mut().set_value(node, value);
                    } else {
                        result.skipped = true;
                    }
                    None
                }
                Step::Resize { width, height } => {
                    let height = height.unwrap_or(page.viewport().height);
                    Some(page.resize(*width, height))
                }
                Step::AdvanceMs(ms) => {
                    page.advance(Duration::from_millis(*ms));
                    None
                }
                Step::InitModals => {
                    page.init_modals();
                    None
                }
            };

            let targets_element = matches!(
                step,
                Step::Click(_) | Step::Hover(_) | Step::Leave(_) | Step::Submit(_)
            );
            if targets_element && outcome.is_none() {
                result.skipped = true;
            }
            if let Some(outcome) = outcome {
                result.invoked = Some(outcome.invoked);
                result.default_prevented = outcome.default_prevented;
            }
            results.push(result);
        }

        Ok(results)
    }
}

fn find<D: Document>(page: &Page<D>, selector: &str) -> UiResult<Option<crate::dom::NodeId>> {
    let parsed = Selector::parse(selector)?;
    let node = page.document().query_first(&parsed);
    if node.is_none() {
        warn!("No element matches '{}', skipping step", selector);
    }
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageOptions;
    use crate::dom::MemoryDocument;

    const PAGE: &str = r##"<body>
        <div id="login-modal" class="modal" style="display: none">
          <div class="modal-content"><a href="#" data-dismiss="modal">Cancel</a></div>
        </div>
        <button class="add-to-cart" data-product-id="9">Add</button>
    </body>"##;

    fn page() -> Page<MemoryDocument> {
        Page::load(MemoryDocument::parse(PAGE), PageOptions::default())
    }

    #[test]
    fn test_parse_steps() {
        let script = Script::from_yaml(
            r##"
viewport: { width: 500, height: 900 }
steps:
  - open: login-modal
  - click: "[data-dismiss=modal]"
  - fill: { selector: "#qty", value: "3" }
  - resize: { width: 1024 }
  - advance_ms: 2000
  - init_modals
"##,
        )
        .unwrap();

        assert_eq!(
            script.viewport,
            Some(Viewport {
                width: 500,
                height: 900
            })
        );
        assert_eq!(
            script.steps,
            vec![
                Step::Open("login-modal".to_string()),
                Step::Click("[data-dismiss=modal]".to_string()),
                Step::Fill {
                    selector: "#qty".to_string(),
                    value: "3".to_string()
                },
                Step::Resize {
                    width: 1024,
                    height: None
                },
                Step::AdvanceMs(2000),
                Step::InitModals,
            ]
        );
    }

    #[test]
    fn test_login_dismiss_script() {
        let mut page = page();
        let script = Script::from_yaml(
            "steps:\n  - open: login-modal\n  - click: \"[data-dismiss=modal]\"\n",
        )
        .unwrap();

        let results = script.run(&mut page).unwrap();

        assert_eq!(results[0].invoked, None);
        assert_eq!(results[1].invoked, Some(2));
        let report = PageReport::capture(&page);
        assert_eq!(report.dialogs[0].display, "none");
        assert_eq!(report.dialogs[0].dismissals, 1);
    }

    #[test]
    fn test_missing_target_is_skipped() {
        let mut page = page();
        let script = Script::from_yaml("steps:\n  - click: \"#nowhere\"\n").unwrap();

        let results = script.run(&mut page).unwrap();

        assert!(results[0].skipped);
        assert_eq!(page.invocations(), 0);
    }

    #[test]
    fn test_bad_selector_fails_run() {
        let mut page = page();
        let script = Script::from_yaml("steps:\n  - click: \"nav a\"\n").unwrap();

        assert!(script.run(&mut page).is_err());
    }

    #[test]
    fn test_report_tracks_cart_and_clock() {
        let mut page = page();
        let script =
            Script::from_yaml("steps:\n  - click: .add-to-cart\n  - advance_ms: 2500\n").unwrap();

        let results = script.run(&mut page).unwrap();
        let report = PageReport::capture(&page);

        assert!(results[0].default_prevented);
        assert_eq!(report.cart, vec!["9".to_string()]);
        assert_eq!(report.elapsed_ms, 2500);
    }

    #[test]
    fn test_parse_shipped_login_script() {
        let script = Script::from_yaml(include_str!("../demos/login.yaml")).unwrap();

        assert_eq!(
            script.viewport,
            Some(Viewport {
                width: 1280,
                height: 800
            })
        );
        assert_eq!(script.steps.len(), 10);
        assert_eq!(script.steps[0], Step::Open("login-modal".to_string()));
        assert_eq!(
            script.steps[8],
            Step::Resize {
                width: 600,
                height: None
            }
        );
        assert_eq!(script.steps[9], Step::AdvanceMs(6000));
    }

    #[test]
    fn test_steps_use_single_key_maps() {
        let script = Script::from_yaml("steps:\n  - key: Escape\n  - init_modals\n").unwrap();
        assert_eq!(script.steps, vec![Step::Key("Escape".to_string()), Step::InitModals]);
    }
}
