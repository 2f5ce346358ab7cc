//! Embeddable chat widget code generation.
//!
//! Produces the two artifacts a customer pastes into their own site: an HTML
//! fragment with an inline script, and a companion stylesheet.
//!
//! Raw request values are parsed into a [`WidgetCustomization`] first; that is
//! the only fallible step. [`generate`] itself is a pure, infallible function of
//! the registry, the domain key and the typed customization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::{BrandConfig, DomainRegistry};

/// Anchor offset applied to both edges of the widget.
const ANCHOR_OFFSET: &str = "20px";

/// Longest accepted color override.
const MAX_COLOR_LENGTH: usize = 64;

/// Characters that would let a color value escape its CSS/JS context.
const FORBIDDEN_COLOR_CHARS: &[char] = &['<', '>', '"', '\'', '`', ';', '{', '}', '\\'];

/// Invalid widget customization.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WidgetError {
    #[error("invalid widget size '{0}': expected small, medium, or large")]
    InvalidSize(String),
    #[error(
        "invalid widget position '{0}': expected top-left, top-right, bottom-left, or bottom-right"
    )]
    InvalidPosition(String),
    #[error("invalid widget color '{0}'")]
    InvalidColor(String),
}

/// Vertical anchor edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Top,
    Bottom,
}

impl Vertical {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

/// Horizontal anchor edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    Left,
    Right,
}

impl Horizontal {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Screen corner the widget is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

impl WidgetPosition {
    #[must_use]
    pub const fn new(vertical: Vertical, horizontal: Horizontal) -> Self {
        match (vertical, horizontal) {
            (Vertical::Top, Horizontal::Left) => Self::TopLeft,
            (Vertical::Top, Horizontal::Right) => Self::TopRight,
            (Vertical::Bottom, Horizontal::Left) => Self::BottomLeft,
            (Vertical::Bottom, Horizontal::Right) => Self::BottomRight,
        }
    }

    #[must_use]
    pub const fn vertical(self) -> Vertical {
        match self {
            Self::TopLeft | Self::TopRight => Vertical::Top,
            Self::BottomLeft | Self::BottomRight => Vertical::Bottom,
        }
    }

    #[must_use]
    pub const fn horizontal(self) -> Horizontal {
        match self {
            Self::TopLeft | Self::BottomLeft => Horizontal::Left,
            Self::TopRight | Self::BottomRight => Horizontal::Right,
        }
    }
}

impl fmt::Display for WidgetPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.vertical().as_str(), self.horizontal().as_str())
    }
}

impl FromStr for WidgetPosition {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WidgetError::InvalidPosition(s.to_owned());

        let (vertical, horizontal) = s.trim().split_once('-').ok_or_else(invalid)?;
        let vertical = match vertical {
            "top" => Vertical::Top,
            "bottom" => Vertical::Bottom,
            _ => return Err(invalid()),
        };
        let horizontal = match horizontal {
            "left" => Horizontal::Left,
            "right" => Horizontal::Right,
            _ => return Err(invalid()),
        };

        Ok(Self::new(vertical, horizontal))
    }
}

/// Widget width preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl WidgetSize {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// CSS width of the chat panel.
    #[must_use]
    pub const fn width(self) -> &'static str {
        match self {
            Self::Small => "300px",
            Self::Medium => "350px",
            Self::Large => "400px",
        }
    }
}

impl fmt::Display for WidgetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetSize {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(WidgetError::InvalidSize(s.to_owned())),
        }
    }
}

/// Customization as submitted by a client, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomizationInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl CustomizationInput {
    /// Validate into a [`WidgetCustomization`].
    ///
    /// # Errors
    ///
    /// See [`WidgetCustomization::parse`].
    pub fn parse(&self) -> Result<WidgetCustomization, WidgetError> {
        WidgetCustomization::parse(
            self.color.as_deref(),
            self.position.as_deref(),
            self.size.as_deref(),
        )
    }
}

/// Validated widget customization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WidgetCustomization {
    /// Accent color override; the brand color is used when `None`.
    pub color: Option<String>,
    pub position: WidgetPosition,
    pub size: WidgetSize,
}

impl WidgetCustomization {
    /// Parse raw customization values.
    ///
    /// Missing position and size take their defaults (`bottom-right`,
    /// `medium`). A blank color is treated as no override.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError`] when the size or position is outside its
    /// enumeration, or the color could break out of the generated markup.
    pub fn parse(
        color: Option<&str>,
        position: Option<&str>,
        size: Option<&str>,
    ) -> Result<Self, WidgetError> {
        let color = color
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(validate_color)
            .transpose()?;
        let position = position.map(str::parse).transpose()?.unwrap_or_default();
        let size = size.map(str::parse).transpose()?.unwrap_or_default();

        Ok(Self {
            color,
            position,
            size,
        })
    }
}

fn validate_color(color: &str) -> Result<String, WidgetError> {
    let unsafe_char = color
        .chars()
        .any(|c| c.is_control() || FORBIDDEN_COLOR_CHARS.contains(&c));
    if unsafe_char || color.len() > MAX_COLOR_LENGTH {
        return Err(WidgetError::InvalidColor(color.to_owned()));
    }
    Ok(color.to_owned())
}

/// Generated widget artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedWidget {
    /// Brand the widget was generated for (after default fallback).
    pub brand: BrandConfig,
    pub html: String,
    pub css: String,
}

/// Generate the widget snippet and stylesheet for `domain_key`.
///
/// Unregistered domain keys use the registry's default brand. The embedded
/// config domain and the "Powered by" link keep the requested domain key.
#[must_use]
pub fn generate(
    registry: &DomainRegistry,
    domain_key: &str,
    customization: &WidgetCustomization,
) -> GeneratedWidget {
    let brand = registry.brand_or_default(domain_key);
    let color = customization.color.as_deref().unwrap_or(&brand.color);
    let domain = widget_domain(domain_key, brand);

    GeneratedWidget {
        html: render_html(brand, &domain, color, customization),
        css: render_css(brand, color, customization),
        brand: brand.clone(),
    }
}

/// Normalized domain key, or the brand key when the input is blank or is
/// not a plain host name.
fn widget_domain(domain_key: &str, brand: &BrandConfig) -> String {
    let domain = domain_key.trim().trim_end_matches('.').to_lowercase();
    let host_name = !domain.is_empty()
        && domain.len() <= 253
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':'));
    if host_name { domain } else { brand.key.clone() }
}

fn render_html(
    brand: &BrandConfig,
    domain: &str,
    color: &str,
    customization: &WidgetCustomization,
) -> String {
    let name = &brand.name;
    let name_lower = brand.name_lower();
    let industry_lower = brand.industry_lower();
    let icon = &brand.icon;
    let position = customization.position;
    let size = customization.size;
    let width = size.width();
    let vertical = position.vertical().as_str();
    let horizontal = position.horizontal().as_str();

    format!(
        r##"<!-- {name} Chat Widget -->
<div id="{name_lower}-chat-widget"></div>
<script>
(function() {{
    // Widget configuration
    const config = {{
        domain: '{domain}',
        name: '{name}',
        color: '{color}',
        position: '{position}',
        size: '{size}',
        poweredBy: '{name}'
    }};

    // Create widget container
    const widget = document.createElement('div');
    widget.id = 'gptsite-widget';
    widget.style.cssText = `
        position: fixed;
        {horizontal}: {ANCHOR_OFFSET};
        {vertical}: {ANCHOR_OFFSET};
        width: {width};
        height: 500px;
        background: white;
        border-radius: 12px;
        box-shadow: 0 8px 32px rgba(0,0,0,0.1);
        z-index: 10000;
        display: none;
        font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    `;

    // Create chat interface
    widget.innerHTML = `
        <div style="background: {color}; color: white; padding: 15px; border-radius: 12px 12px 0 0; display: flex; justify-content: space-between; align-items: center;">
            <div style="display: flex; align-items: center; gap: 8px;">
                <span style="font-size: 20px;">{icon}</span>
                <span style="font-weight: 600;">{name} Assistant</span>
            </div>
            <button onclick="toggleWidget()" style="background: none; border: none; color: white; font-size: 18px; cursor: pointer;">×</button>
        </div>
        <div style="padding: 20px; height: 380px; overflow-y: auto;">
            <div style="background: #f3f4f6; padding: 12px; border-radius: 8px; margin-bottom: 15px;">
                Hi! I'm your {industry_lower} assistant. I can help you with information about our services. What would you like to know?
            </div>
        </div>
        <div style="padding: 15px; border-top: 1px solid #e5e7eb;">
            <div style="display: flex; gap: 8px;">
                <input type="text" placeholder="Type your message..." style="flex: 1; padding: 10px; border: 1px solid #d1d5db; border-radius: 6px; outline: none;">
                <button style="background: {color}; color: white; border: none; padding: 10px 15px; border-radius: 6px; cursor: pointer;">Send</button>
            </div>
            <div style="text-align: center; margin-top: 8px; font-size: 12px; color: #6b7280;">
                Powered by <a href="https://{domain}" target="_blank" style="color: {color}; text-decoration: none;">{name}</a>
            </div>
        </div>
    `;

    // Create toggle button
    const toggleBtn = document.createElement('button');
    toggleBtn.id = 'gptsite-toggle';
    toggleBtn.style.cssText = `
        position: fixed;
        {horizontal}: {ANCHOR_OFFSET};
        {vertical}: {ANCHOR_OFFSET};
        width: 60px;
        height: 60px;
        background: {color};
        border: none;
        border-radius: 50%;
        color: white;
        font-size: 24px;
        cursor: pointer;
        box-shadow: 0 4px 16px rgba(0,0,0,0.2);
        z-index: 10001;
        transition: transform 0.2s;
    `;
    toggleBtn.innerHTML = '{icon}';
    toggleBtn.onclick = function() {{ toggleWidget(); }};

    window.toggleWidget = function() {{
        const isVisible = widget.style.display !== 'none';
        widget.style.display = isVisible ? 'none' : 'block';
        toggleBtn.style.transform = isVisible ? 'scale(1)' : 'scale(0.9)';
    }};

    document.body.appendChild(widget);
    document.body.appendChild(toggleBtn);

    console.log('{name} widget loaded successfully');
}})();
</script>"##
    )
}

fn render_css(brand: &BrandConfig, color: &str, customization: &WidgetCustomization) -> String {
    let name = &brand.name;
    let name_lower = brand.name_lower();
    let vertical = customization.position.vertical().as_str();
    let horizontal = customization.position.horizontal().as_str();

    format!(
        r"/* {name} Widget Styles */
#{name_lower}-chat-widget {{
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
}}

.gptsite-widget-container {{
    position: fixed;
    {horizontal}: {ANCHOR_OFFSET};
    {vertical}: {ANCHOR_OFFSET};
    z-index: 10000;
}}

.gptsite-widget-toggle {{
    background: {color};
    border: none;
    border-radius: 50%;
    width: 60px;
    height: 60px;
    color: white;
    font-size: 24px;
    cursor: pointer;
    box-shadow: 0 4px 16px rgba(0,0,0,0.2);
    transition: transform 0.2s;
}}

.gptsite-widget-toggle:hover {{
    transform: scale(1.05);
}}"
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn defaults() -> WidgetCustomization {
        WidgetCustomization::parse(None, None, None).unwrap()
    }

    #[test]
    fn test_defaults() {
        let c = defaults();
        assert_eq!(c.color, None);
        assert_eq!(c.position, WidgetPosition::BottomRight);
        assert_eq!(c.size, WidgetSize::Medium);
    }

    #[test]
    fn test_brand_color_used_without_override() {
        let registry = DomainRegistry::builtin();
        for key in registry.keys() {
            let widget = generate(&registry, key, &defaults());
            let color = &registry.brand(key).unwrap().color;
            assert!(widget.html.contains(&format!("color: '{color}'")));
            assert!(widget.html.contains(&format!("background: {color};")));
            assert!(widget.css.contains(&format!("background: {color};")));
        }
    }

    #[test]
    fn test_color_override() {
        let registry = DomainRegistry::builtin();
        let c = WidgetCustomization::parse(Some("#FF0000"), None, None).unwrap();
        let widget = generate(&registry, "lawfirmgpt.ai", &c);
        assert!(widget.html.contains("color: '#FF0000'"));
        assert!(widget.css.contains("background: #FF0000;"));
        assert!(!widget.css.contains("#1E40AF"));
    }

    #[test]
    fn test_blank_color_is_no_override() {
        let c = WidgetCustomization::parse(Some("   "), None, None).unwrap();
        assert_eq!(c.color, None);
    }

    #[test]
    fn test_size_widths() {
        let registry = DomainRegistry::builtin();
        for (size, width) in [("small", "300px"), ("medium", "350px"), ("large", "400px")] {
            let c = WidgetCustomization::parse(None, None, Some(size)).unwrap();
            let widget = generate(&registry, "edgpt.ai", &c);
            assert!(widget.html.contains(&format!("width: {width};")), "{size}");
            assert!(widget.html.contains(&format!("size: '{size}'")));
        }
    }

    #[test]
    fn test_invalid_size() {
        assert_eq!(
            WidgetCustomization::parse(None, None, Some("xlarge")),
            Err(WidgetError::InvalidSize("xlarge".to_owned()))
        );
    }

    #[test]
    fn test_position_anchors() {
        let p: WidgetPosition = "bottom-right".parse().unwrap();
        assert_eq!(p.vertical(), Vertical::Bottom);
        assert_eq!(p.horizontal(), Horizontal::Right);

        let p: WidgetPosition = "top-left".parse().unwrap();
        assert_eq!(p, WidgetPosition::TopLeft);
        assert_eq!(p.to_string(), "top-left");
    }

    #[test]
    fn test_position_in_generated_css() {
        let registry = DomainRegistry::builtin();
        let c = WidgetCustomization::parse(None, Some("top-left"), None).unwrap();
        let widget = generate(&registry, "cpafirm.ai", &c);
        assert!(widget.css.contains("left: 20px;\n    top: 20px;"));
        assert!(widget.html.contains("left: 20px;"));
        assert!(widget.html.contains("top: 20px;"));
        assert!(!widget.css.contains("bottom: 20px"));
    }

    #[test]
    fn test_invalid_positions() {
        for bad in ["center", "top", "middle-left", "top-center", "right-top", ""] {
            assert_eq!(
                bad.parse::<WidgetPosition>(),
                Err(WidgetError::InvalidPosition(bad.to_owned())),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_unsafe_color_rejected() {
        for bad in ["red;}</style>", "'+alert(1)+'", "#f\u{7}ff", "#f\nff", "`x`"] {
            assert!(matches!(
                WidgetCustomization::parse(Some(bad), None, None),
                Err(WidgetError::InvalidColor(_))
            ));
        }
        assert!(WidgetCustomization::parse(Some("rgb(1, 2, 3)"), None, None).is_ok());
    }

    #[test]
    fn test_color_surrounding_whitespace_trimmed() {
        let c = WidgetCustomization::parse(Some(" #fff \n"), None, None).unwrap();
        assert_eq!(c.color.as_deref(), Some("#fff"));

        let blank = WidgetCustomization::parse(Some(" \t\n"), None, None).unwrap();
        assert_eq!(blank.color, None);
    }

    #[test]
    fn test_brand_substitution() {
        let registry = DomainRegistry::builtin();
        let widget = generate(&registry, "lawfirmgpt.ai", &defaults());
        assert!(widget.html.contains("<!-- LawFirmGPT Chat Widget -->"));
        assert!(widget.html.contains(r#"<div id="lawfirmgpt-chat-widget"></div>"#));
        assert!(widget.html.contains("LawFirmGPT Assistant"));
        assert!(widget.html.contains("your legal assistant"));
        assert!(widget.html.contains(r#"href="https://lawfirmgpt.ai""#));
        assert!(widget.css.contains("#lawfirmgpt-chat-widget {"));
        assert!(widget.css.contains("#1E40AF"));
    }

    #[test]
    fn test_unknown_domain_uses_default_brand() {
        let registry = DomainRegistry::builtin();
        let widget = generate(&registry, "nowhere.example", &defaults());
        assert_eq!(widget.brand.key, "edgpt.ai");
        assert!(widget.html.contains("EdGPT Assistant"));
        assert!(widget.html.contains(r#"href="https://nowhere.example""#));
        assert!(widget.html.contains("domain: 'nowhere.example'"));
    }

    #[test]
    fn test_widget_domain_keeps_normalized_input() {
        let registry = DomainRegistry::builtin();
        let widget = generate(&registry, " LawFirmGPT.ai. ", &defaults());
        assert_eq!(widget.brand.key, "lawfirmgpt.ai");
        assert!(widget.html.contains(r#"href="https://lawfirmgpt.ai""#));

        let widget = generate(&registry, "evil.example'};alert(1)//", &defaults());
        assert_eq!(widget.brand.key, "edgpt.ai");
        assert!(widget.html.contains(r#"href="https://edgpt.ai""#));
        assert!(!widget.html.contains("alert(1)"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let registry = DomainRegistry::builtin();
        let c = WidgetCustomization::parse(Some("#123456"), Some("top-right"), Some("large"))
            .unwrap();
        let first = generate(&registry, "taxprepgpt.ai", &c);
        let second = generate(&registry, "taxprepgpt.ai", &c);
        assert_eq!(first, second);
    }

    #[test]
    fn test_customization_input_parse() {
        let input: CustomizationInput =
            serde_json::from_str(r#"{"position": "top-right", "size": "small"}"#).unwrap();
        let c = input.parse().unwrap();
        assert_eq!(c.position, WidgetPosition::TopRight);
        assert_eq!(c.size, WidgetSize::Small);

        let empty: CustomizationInput = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.parse().unwrap(), WidgetCustomization::default());
    }
}
