#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use scry_drivers::{BrowserPage, PageLauncher};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the fake page renders and where it misbehaves.
#[derive(Debug, Clone)]
pub struct PageScript {
    /// selector -> rendered text of every match, in DOM order
    pub elements: HashMap<String, Vec<String>>,
    /// text returned by the fallback harvest script
    pub page_text: String,
    pub ready_state: String,
    pub launch_error: Option<String>,
    pub goto_delay: Option<Duration>,
    pub goto_error: Option<String>,
    pub goto_panic: bool,
    pub find_delay: Option<Duration>,
    pub find_errors: HashSet<String>,
    pub script_error: Option<String>,
    pub close_error: bool,
}

impl Default for PageScript {
    fn default() -> Self {
        Self {
            elements: HashMap::new(),
            page_text: String::new(),
            ready_state: "complete".into(),
            launch_error: None,
            goto_delay: None,
            goto_error: None,
            goto_panic: false,
            find_delay: None,
            find_errors: HashSet::new(),
            script_error: None,
            close_error: false,
        }
    }
}

impl PageScript {
    /// Append a match for `selector`; repeated calls add later DOM matches.
    pub fn with_element(mut self, selector: &str, text: &str) -> Self {
        self.elements
            .entry(selector.to_string())
            .or_default()
            .push(text.to_string());
        self
    }

    pub fn with_page_text(mut self, text: &str) -> Self {
        self.page_text = text.to_string();
        self
    }
}

/// Counters shared between the test and every page the launcher creates.
#[derive(Debug, Default)]
pub struct Probe {
    pub launches: AtomicUsize,
    pub closes: AtomicUsize,
    pub open_now: AtomicUsize,
    pub peak_open: AtomicUsize,
    pub visited: Mutex<Vec<String>>,
    pub lookups: Mutex<Vec<String>>,
    pub typed: Mutex<Vec<String>>,
    pub clicked: Mutex<Vec<String>>,
    pub entered: Mutex<Vec<String>>,
    pub scripts: AtomicUsize,
}

impl Probe {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn peak_open(&self) -> usize {
        self.peak_open.load(Ordering::SeqCst)
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

pub struct FakeLauncher {
    pub script: PageScript,
    pub probe: Arc<Probe>,
}

impl FakeLauncher {
    pub fn new(script: PageScript) -> (Self, Arc<Probe>) {
        let probe = Arc::new(Probe::default());
        (
            Self {
                script,
                probe: Arc::clone(&probe),
            },
            probe,
        )
    }
}

#[async_trait]
impl PageLauncher for FakeLauncher {
    type Page = FakePage;

    async fn launch(&self) -> Result<FakePage> {
        self.probe.launches.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.script.launch_error {
            return Err(anyhow!("{err}"));
        }
        let now = self.probe.open_now.fetch_add(1, Ordering::SeqCst) + 1;
        self.probe.peak_open.fetch_max(now, Ordering::SeqCst);
        Ok(FakePage {
            script: self.script.clone(),
            probe: Arc::clone(&self.probe),
        })
    }
}

pub struct FakePage {
    script: PageScript,
    probe: Arc<Probe>,
}

#[async_trait]
impl BrowserPage for FakePage {
    type Element = String;

    async fn set_page_load_timeout(&mut self, _timeout: Duration) -> Result<()> {
        Ok(())
    }

    async fn goto(&mut self, url: &str) -> Result<()> {
        self.probe.visited.lock().unwrap().push(url.to_string());
        if let Some(delay) = self.script.goto_delay {
            tokio::time::sleep(delay).await;
        }
        if self.script.goto_panic {
            panic!("renderer crashed while loading {url}");
        }
        match &self.script.goto_error {
            Some(err) => Err(anyhow!("{err}")),
            None => Ok(()),
        }
    }

    async fn ready_state(&self) -> Result<String> {
        Ok(self.script.ready_state.clone())
    }

    async fn find(&self, selector: &str, _wait: Duration) -> Result<Option<String>> {
        self.probe.lookups.lock().unwrap().push(selector.to_string());
        if let Some(delay) = self.script.find_delay {
            tokio::time::sleep(delay).await;
        }
        if self.script.find_errors.contains(selector) {
            return Err(anyhow!("stale element reference for {selector}"));
        }
        Ok(self
            .script
            .elements
            .contains_key(selector)
            .then(|| selector.to_string()))
    }

    /// The element handle is its selector; lookups return the first match.
    async fn text(&self, element: &String) -> Result<String> {
        self.script
            .elements
            .get(element)
            .and_then(|matches| matches.first())
            .cloned()
            .ok_or_else(|| anyhow!("element vanished"))
    }

    async fn type_text(&self, element: &String, text: &str) -> Result<()> {
        self.probe
            .typed
            .lock()
            .unwrap()
            .push(format!("{element}<-{text}"));
        Ok(())
    }

    async fn click(&self, element: &String) -> Result<()> {
        self.probe.clicked.lock().unwrap().push(element.clone());
        Ok(())
    }

    async fn press_enter(&self, element: &String) -> Result<()> {
        self.probe.entered.lock().unwrap().push(element.clone());
        Ok(())
    }

    async fn execute(&self, _script: &str) -> Result<serde_json::Value> {
        self.probe.scripts.fetch_add(1, Ordering::SeqCst);
        match &self.script.script_error {
            Some(err) => Err(anyhow!("{err}")),
            None => Ok(serde_json::Value::String(self.script.page_text.clone())),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.probe.closes.fetch_add(1, Ordering::SeqCst);
        self.probe.open_now.fetch_sub(1, Ordering::SeqCst);
        if self.script.close_error {
            return Err(anyhow!("chromedriver already gone"));
        }
        Ok(())
    }
}
