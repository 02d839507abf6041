//! Chromium backend over the DevTools protocol
//!
//! Element queries run as page scripts that evaluate a serialized
//! [`Selector`]. Real input (clicks, hovers, key presses) goes through CDP
//! after the script tags the element with a one-off token attribute.

use crate::{
    errors::ActionError,
    page::{BrowserPage, ElementHandle, POLL_INTERVAL},
    types::{LoadState, MouseButton, SelectOption, Selector, WindowTarget},
};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, CaptureScreenshotParams};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use uuid::Uuid;

const ANCHOR_ATTR: &str = "data-stepwright-anchor";

/// Quiet window before the network counts as idle
const NETWORK_QUIET: Duration = Duration::from_millis(500);

/// Launch options for [`ChromiumPage::launch`]
#[derive(Debug, Clone)]
pub struct ChromiumOptions {
    pub headless: bool,
    pub executable: Option<PathBuf>,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for ChromiumOptions {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            window_width: 1366,
            window_height: 768,
        }
    }
}

struct Session {
    browser: Mutex<Browser>,
    current: parking_lot::RwLock<Page>,
    handler: tokio::task::JoinHandle<()>,
}

impl Session {
    fn page(&self) -> Page {
        self.current.read().clone()
    }

    async fn evaluate<T: serde::de::DeserializeOwned>(&self, expr: String) -> Result<T, ActionError> {
        let result = self.page().evaluate(expr).await.map_err(cdp)?;
        result
            .into_value()
            .map_err(|err| ActionError::CdpIo(format!("unexpected script result: {}", err)))
    }
}

fn cdp(err: impl std::fmt::Display) -> ActionError {
    ActionError::CdpIo(err.to_string())
}

/// A Chromium tab driven through chromiumoxide
#[derive(Clone)]
pub struct ChromiumPage {
    session: Arc<Session>,
}

impl ChromiumPage {
    /// Launch a browser and open a blank tab
    pub async fn launch(options: ChromiumOptions) -> Result<Self, ActionError> {
        let mut builder = BrowserConfig::builder().window_size(options.window_width, options.window_height);
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &options.executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(ActionError::CdpIo)?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(cdp)?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await.map_err(cdp)?;
        info!(headless = options.headless, "Chromium session started");

        Ok(Self {
            session: Arc::new(Session {
                browser: Mutex::new(browser),
                current: parking_lot::RwLock::new(page),
                handler,
            }),
        })
    }

    /// Close the browser
    pub async fn close(&self) -> Result<(), ActionError> {
        let mut browser = self.session.browser.lock().await;
        browser.close().await.map_err(cdp)?;
        self.session.handler.abort();
        Ok(())
    }

    async fn ready_state(&self) -> Result<String, ActionError> {
        self.session
            .evaluate("document.readyState".to_string())
            .await
    }

    async fn resource_count(&self) -> Result<u64, ActionError> {
        self.session
            .evaluate("performance.getEntriesByType('resource').length".to_string())
            .await
    }
}

#[derive(Debug, Deserialize)]
struct ScriptResult {
    found: bool,
    #[serde(default)]
    value: Value,
}

/// Lazy handle evaluated on the tab currently in front
pub struct ChromiumElement {
    selector: Selector,
    session: Arc<Session>,
}

impl ChromiumElement {
    async fn run(&self, op: &str, arg: Value) -> Result<ScriptResult, ActionError> {
        let expression = element_script(&self.selector, op, &arg)?;
        self.session.evaluate(expression).await
    }

    async fn run_found(&self, op: &str, arg: Value) -> Result<Value, ActionError> {
        let result = self.run(op, arg).await?;
        if !result.found {
            return Err(ActionError::ElementNotFound(self.selector.to_string()));
        }
        Ok(result.value)
    }

    /// Tag the element and return a CDP handle to it
    async fn element(&self) -> Result<Element, ActionError> {
        let token = format!("el-{}", Uuid::new_v4().simple());
        self.run_found("tag", json!(token)).await?;
        self.session
            .page()
            .find_element(format!("[{}=\"{}\"]", ANCHOR_ATTR, token))
            .await
            .map_err(cdp)
    }
}

#[async_trait]
impl ElementHandle for ChromiumElement {
    fn selector(&self) -> &Selector {
        &self.selector
    }

    async fn is_visible(&self) -> Result<bool, ActionError> {
        let result = self.run("visible", Value::Null).await?;
        Ok(result.found && result.value.as_bool().unwrap_or(false))
    }

    async fn is_enabled(&self) -> Result<bool, ActionError> {
        let result = self.run("enabled", Value::Null).await?;
        Ok(result.found && result.value.as_bool().unwrap_or(false))
    }

    async fn text_content(&self) -> Result<Option<String>, ActionError> {
        let result = self.run("text", Value::Null).await?;
        if !result.found {
            return Ok(None);
        }
        Ok(Some(result.value.as_str().unwrap_or_default().to_string()))
    }

    async fn fill(&self, value: &str) -> Result<(), ActionError> {
        self.run_found("fill", json!(value)).await.map(|_| ())
    }

    async fn clear(&self) -> Result<(), ActionError> {
        self.run_found("fill", json!("")).await.map(|_| ())
    }

    async fn click(&self, button: MouseButton) -> Result<(), ActionError> {
        match button {
            MouseButton::Left => {
                let element = self.element().await?;
                element.scroll_into_view().await.map_err(cdp)?;
                element.click().await.map_err(cdp)?;
            }
            MouseButton::Right => {
                self.run_found("contextmenu", Value::Null).await?;
            }
        }
        Ok(())
    }

    async fn double_click(&self) -> Result<(), ActionError> {
        self.run_found("dblclick", Value::Null).await.map(|_| ())
    }

    async fn hover(&self) -> Result<(), ActionError> {
        let element = self.element().await?;
        element.hover().await.map_err(cdp)?;
        Ok(())
    }

    async fn set_checked(&self, checked: bool) -> Result<(), ActionError> {
        self.run_found("check", json!(checked)).await.map(|_| ())
    }

    async fn select_option(&self, option: &SelectOption) -> Result<(), ActionError> {
        let arg = match option {
            SelectOption::ValueOrLabel(v) => json!({ "text": v, "labelOnly": false }),
            SelectOption::Label(v) => json!({ "text": v, "labelOnly": true }),
        };
        let selected = self.run_found("select", arg).await?;
        if selected.as_bool().unwrap_or(false) {
            Ok(())
        } else {
            Err(ActionError::OptionNotFound(option.as_str().to_string()))
        }
    }

    async fn press(&self, key: &str) -> Result<(), ActionError> {
        let element = self.element().await?;
        element.focus().await.map_err(cdp)?;
        element.press_key(key).await.map_err(cdp)?;
        Ok(())
    }
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    fn locate(&self, selector: Selector) -> Arc<dyn ElementHandle> {
        Arc::new(ChromiumElement {
            selector,
            session: Arc::clone(&self.session),
        })
    }

    async fn goto(&self, url: &str) -> Result<(), ActionError> {
        debug!(url, "Navigating");
        self.session.page().goto(url).await.map_err(cdp)?;
        Ok(())
    }

    async fn wait_for_load_state(
        &self,
        state: LoadState,
        timeout: Duration,
    ) -> Result<(), ActionError> {
        let started = Instant::now();
        let mut last_count = None;
        let mut quiet_since = Instant::now();

        loop {
            let reached = match state {
                LoadState::Load => self.ready_state().await? == "complete",
                LoadState::DomContentLoaded => self.ready_state().await? != "loading",
                LoadState::NetworkIdle => {
                    let count = self.resource_count().await?;
                    if last_count != Some(count) {
                        last_count = Some(count);
                        quiet_since = Instant::now();
                    }
                    quiet_since.elapsed() >= NETWORK_QUIET
                }
            };
            if reached {
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(ActionError::WaitTimeout(format!(
                    "{} not reached after {}ms",
                    state.name(),
                    timeout.as_millis()
                )));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn press_key(&self, key: &str) -> Result<(), ActionError> {
        let token = format!("focus-{}", Uuid::new_v4().simple());
        let expression = format!(
            r#"(() => {{
                const el = document.activeElement || document.body;
                el.setAttribute({attr}, {token});
                return true;
            }})()"#,
            attr = to_js(&ANCHOR_ATTR)?,
            token = to_js(&token)?,
        );
        self.session.evaluate::<bool>(expression).await?;
        let element = self
            .session
            .page()
            .find_element(format!("[{}=\"{}\"]", ANCHOR_ATTR, token))
            .await
            .map_err(cdp)?;
        element.press_key(key).await.map_err(cdp)?;
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, ActionError> {
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let screenshot = self.session.page().execute(params).await.map_err(cdp)?;

        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(&screenshot.data)
            .map_err(|err| ActionError::Internal(format!("invalid screenshot payload: {}", err)))
    }

    async fn has_visible_text(&self, text: &str) -> Result<bool, ActionError> {
        let result: ScriptResult = self
            .session
            .evaluate(element_script(&Selector::text(text, false), "visible", &Value::Null)?)
            .await?;
        Ok(result.found && result.value.as_bool().unwrap_or(false))
    }

    async fn switch_window(&self, target: WindowTarget) -> Result<bool, ActionError> {
        let pages = {
            let browser = self.session.browser.lock().await;
            browser.pages().await.map_err(cdp)?
        };
        let current_id = self.session.page().target_id().clone();
        let current = pages
            .iter()
            .position(|page| *page.target_id() == current_id)
            .unwrap_or(0);
        let index = match target {
            WindowTarget::Next => current + 1,
            WindowTarget::Index(index) => index,
        };

        let Some(page) = pages.get(index).cloned() else {
            warn!(index, open = pages.len(), "No such window");
            return Ok(false);
        };
        page.bring_to_front().await.map_err(cdp)?;
        *self.session.current.write() = page;
        info!(index, "Switched window");
        Ok(true)
    }
}

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, ActionError> {
    serde_json::to_string(value)
        .map_err(|err| ActionError::Internal(format!("failed to encode script argument: {}", err)))
}

/// Script locating the first element for `selector` and applying `op` to it.
/// Always returns `{ found, value }`.
fn element_script(selector: &Selector, op: &str, arg: &Value) -> Result<String, ActionError> {
    Ok(format!(
        r#"(() => {{
            const wanted = {wanted};
            const op = {op};
            const arg = {arg};
            const attr = {attr};
            const norm = (v) => (v || '').replace(/\s+/g, ' ').trim();
            const textOf = (el) => norm(el.innerText || el.textContent);
            const same = (value, target, exact) => exact
                ? value === norm(target)
                : value.toLowerCase().includes(norm(target).toLowerCase());
            const isVisible = (el) => {{
                if (!(el instanceof Element)) return false;
                const style = window.getComputedStyle(el);
                if (style.visibility === 'hidden' || style.display === 'none') return false;
                const rect = el.getBoundingClientRect();
                return rect.width > 0 || rect.height > 0 || el.getClientRects().length > 0;
            }};
            const byText = (roots, target, exact) => {{
                for (const root of roots) {{
                    const nodes = [root, ...root.querySelectorAll('*')]
                        .filter(el => el instanceof Element && same(textOf(el), target, exact));
                    const leaf = nodes.find(el => ![...el.children].some(c => same(textOf(c), target, exact)));
                    if (leaf) return leaf;
                }}
                return null;
            }};
            const implicit = {{
                button: 'button, input[type=button], input[type=submit]',
                textbox: 'input:not([type]), input[type=text], input[type=email], input[type=password], input[type=search], input[type=tel], input[type=url], textarea',
                combobox: 'select',
                link: 'a[href]',
                checkbox: 'input[type=checkbox]',
                radio: 'input[type=radio]',
                heading: 'h1, h2, h3, h4, h5, h6'
            }};
            const accessibleName = (el) => {{
                const aria = el.getAttribute('aria-label');
                if (aria) return norm(aria);
                if (el.labels && el.labels.length) return textOf(el.labels[0]);
                if (el.title) return norm(el.title);
                if (el.placeholder) return norm(el.placeholder);
                return textOf(el);
            }};
            const byLabel = (target) => {{
                for (const label of document.querySelectorAll('label')) {{
                    if (!same(textOf(label), target, false)) continue;
                    if (label.control) return label.control;
                    const inner = label.querySelector('input, select, textarea');
                    if (inner) return inner;
                }}
                return [...document.querySelectorAll('[aria-label]')]
                    .find(el => same(norm(el.getAttribute('aria-label')), target, false)) || null;
            }};
            const byRole = (role, name) => {{
                const css = '[role="' + role + '"]' + (implicit[role] ? ', ' + implicit[role] : '');
                return [...document.querySelectorAll(css)]
                    .find(el => !name || same(accessibleName(el), name, false)) || null;
            }};
            const near = (target, anchorText) => {{
                const anchor = byText([document.body], anchorText, false);
                if (!anchor) return null;
                const a = anchor.getBoundingClientRect();
                let best = null;
                let bestDistance = 50;
                for (const el of document.querySelectorAll(target)) {{
                    const r = el.getBoundingClientRect();
                    const dx = Math.max(0, a.left - r.right, r.left - a.right);
                    const dy = Math.max(0, a.top - r.bottom, r.top - a.bottom);
                    const distance = Math.hypot(dx, dy);
                    if (distance <= bestDistance) {{
                        best = el;
                        bestDistance = distance;
                    }}
                }}
                return best;
            }};
            const find = () => {{
                switch (wanted.kind) {{
                    case 'xpath':
                        return document.evaluate(wanted.path, document, null,
                            XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;
                    case 'css': return document.querySelector(wanted.css);
                    case 'text': return byText([document.body], wanted.text, wanted.exact);
                    case 'label': return byLabel(wanted.text);
                    case 'role': return byRole(wanted.role, wanted.name);
                    case 'near': return near(wanted.target, wanted.anchor_text);
                    case 'css_text': return byText([...document.querySelectorAll(wanted.css)], wanted.text, wanted.exact);
                    default: return null;
                }}
            }};
            let el = null;
            try {{ el = find(); }} catch (e) {{ el = null; }}
            if (!el) return {{ found: false }};
            const fire = (type) => el.dispatchEvent(new Event(type, {{ bubbles: true }}));
            switch (op) {{
                case 'visible': return {{ found: true, value: isVisible(el) }};
                case 'enabled': return {{ found: true, value: !el.disabled }};
                case 'text': return {{ found: true, value: el.textContent || '' }};
                case 'tag':
                    el.setAttribute(attr, arg);
                    return {{ found: true, value: arg }};
                case 'fill':
                    el.focus();
                    el.value = arg;
                    fire('input');
                    fire('change');
                    return {{ found: true }};
                case 'dblclick':
                    el.dispatchEvent(new MouseEvent('dblclick', {{ bubbles: true }}));
                    return {{ found: true }};
                case 'contextmenu':
                    el.dispatchEvent(new MouseEvent('contextmenu', {{ bubbles: true, button: 2 }}));
                    return {{ found: true }};
                case 'check':
                    if (el.checked !== arg) el.click();
                    return {{ found: true }};
                case 'select': {{
                    const option = [...(el.options || [])].find(o =>
                        norm(o.label || o.textContent) === norm(arg.text)
                        || (!arg.labelOnly && o.value === arg.text));
                    if (!option) return {{ found: true, value: false }};
                    el.value = option.value;
                    fire('input');
                    fire('change');
                    return {{ found: true, value: true }};
                }}
                default: return {{ found: true }};
            }}
        }})()"#,
        wanted = to_js(selector)?,
        op = to_js(op)?,
        arg = to_js(arg)?,
        attr = to_js(ANCHOR_ATTR)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_embeds_serialized_selector() {
        let script = element_script(
            &Selector::role("combobox", Some("Country".into())),
            "visible",
            &Value::Null,
        )
        .unwrap();
        assert!(script.contains(r#""kind":"role""#));
        assert!(script.contains(r#""name":"Country""#));
        assert!(script.contains(r#"const op = "visible";"#));
    }
}
