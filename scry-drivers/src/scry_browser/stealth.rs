use scry_config::{StealthLevel, WebDriverConfig};

/// Chrome command‑line arguments for a launch.
///
/// The user agent and accept-language flags are how the fixed request header
/// set reaches every request the tab makes; WebDriver has no header API.
pub fn build_launch_arguments(config: &WebDriverConfig) -> Vec<String> {
    let languages = config.accept_language.join(",");
    let mut args = vec![
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-infobars".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--no-sandbox".to_string(),
        "--disable-extensions".to_string(),
        "--disable-plugins-discovery".to_string(),
        format!("--user-agent={}", config.user_agent),
        format!("--window-size={},{}", config.window.0, config.window.1),
        format!("--lang={languages}"),
        format!("--accept-lang={languages}"),
    ];
    if config.headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
    } else if config.stealth == StealthLevel::Maximum {
        args.push("--disable-gpu".to_string());
    }
    args
}

/// JavaScript evasions applied after navigation, by stealth level.
pub fn evasion_scripts(level: StealthLevel) -> Vec<&'static str> {
    match level {
        StealthLevel::Lightweight => vec![CORE_EVASIONS],
        StealthLevel::Balanced => vec![CORE_EVASIONS, CANVAS_EVASIONS],
        StealthLevel::Maximum => vec![CORE_EVASIONS, CANVAS_EVASIONS, WEBGL_EVASIONS],
    }
}

const CORE_EVASIONS: &str = r#"
    Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
    Object.defineProperty(navigator, 'plugins', { get: () => [1,2,3] });
    if (!window.chrome) window.chrome = { runtime: {} };
"#;

const WEBGL_EVASIONS: &str = r#"
    const getParameter = WebGLRenderingContext.prototype.getParameter;
    WebGLRenderingContext.prototype.getParameter = function(parameter) {
        if (parameter === 37445) return 'Intel Inc.';
        if (parameter === 37446) return 'Intel Iris OpenGL Engine';
        return getParameter.call(this, parameter);
    };
"#;

const CANVAS_EVASIONS: &str = r#"
    const toDataURL = HTMLCanvasElement.prototype.toDataURL;
    HTMLCanvasElement.prototype.toDataURL = function(...args) {
        const ctx = this.getContext('2d');
        if (ctx && this.width && this.height) {
            const img = ctx.getImageData(0, 0, this.width, this.height);
            for (let i = 0; i < img.data.length; i += 4) {
                if (Math.random() < 0.001) img.data[i] += Math.random() < 0.5 ? -1 : 1;
            }
            ctx.putImageData(img, 0, 0);
        }
        return toDataURL.apply(this, args);
    };
"#;
