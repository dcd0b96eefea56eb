//! Built-in promotional popup templates

use std::time::Duration;

use crate::config::ConfigValue;
use crate::interaction::InteractionDescriptor;
use crate::stylesheet::{StyleMode, StylesheetSpec};

use super::catalog::{RenderFault, Template, TemplateCatalog};

const CLOSE_SVG: &str = r#"<svg viewBox="0 0 24 24" fill="none" stroke="white" stroke-width="2.5" stroke-linecap="round">
        <line x1="6" y1="6" x2="18" y2="18"></line>
        <line x1="18" y1="6" x2="6" y2="18"></line>
      </svg>"#;

const DEFAULT_CLAIM_COIN: &str = "assets/images/sc-coin.png";

/// How long a claim button stays in the claimed state
pub const CLAIM_RESET: Duration = Duration::from_millis(1200);

/// Horizontal offset and animation delay of each coin in the claim fountain
const COIN_FOUNTAIN: [(i32, &str); 5] = [
    (-40, "0s"),
    (-15, "0.07s"),
    (10, "0.14s"),
    (35, "0.21s"),
    (-25, "0.28s"),
];

/// The three popups of the studio, all composed under one stylesheet policy
pub fn builtin_catalog(mode: StyleMode) -> TemplateCatalog {
    let templates = vec![
        special_offer().with_stylesheet(spec_for(mode, SPECIAL_OFFER_CSS)),
        free_coins_v1().with_stylesheet(spec_for(mode, FREE_COINS_V1_CSS)),
        free_coins_v2().with_stylesheet(spec_for(mode, FREE_COINS_V2_CSS)),
    ];
    TemplateCatalog::new(templates).expect("built-in templates should render their defaults")
}

fn spec_for(mode: StyleMode, fragment: &'static str) -> StylesheetSpec {
    match mode {
        StyleMode::Inline => StylesheetSpec::Inline(fragment.into()),
        StyleMode::External => StylesheetSpec::ExternalBase,
        StyleMode::Editable => StylesheetSpec::EditableOverride,
    }
}

fn s(value: &str) -> ConfigValue {
    ConfigValue::str(value)
}

// ---------------------------------------------------------------------------
// Special Offer

fn special_offer() -> Template {
    let defaults = ConfigValue::map([
        ("title", s("Special Offer! 🎁")),
        ("subtitle", s("SHOW UP DAILY - AND CLAIM YOUR REWARDS")),
        ("heroImage", s("assets/images/roo-character.png")),
        ("bgSvg", s("assets/images/offer-bg-wave.svg")),
        (
            "scatterImages",
            ConfigValue::map([
                ("tl", s("assets/images/sc-coins-scatter1.png")),
                ("mr", s("assets/images/sc-coins-scatter2.png")),
                ("br", s("assets/images/roo-coins-scatter.png")),
            ]),
        ),
        (
            "amounts",
            ConfigValue::Seq(vec![
                ConfigValue::map([
                    ("icon", s("assets/images/gc-coin.png")),
                    ("value", s("1,000,000")),
                    ("type", s("gc")),
                ]),
                ConfigValue::map([
                    ("icon", s("assets/images/sc-coin.png")),
                    ("value", s("40")),
                    ("type", s("sc")),
                    ("label", s("FOR\nFREE")),
                ]),
            ]),
        ),
        ("cta", ConfigValue::map([("text", s("Buy for $24.99"))])),
    ]);
    Template::new("Special Offer", defaults, render_special_offer)
}

fn render_special_offer(config: &ConfigValue) -> Result<String, RenderFault> {
    let amounts = config.require_seq("amounts")?;
    let blocks: Vec<String> = amounts
        .iter()
        .map(|amount| {
            let color_class = match amount.text_field("type").as_deref() {
                Some("gc") => "popup-amount-value--gc",
                _ => "popup-amount-value--sc",
            };
            let label = amount
                .text_field("label")
                .filter(|l| !l.is_empty())
                .map(|l| format!("\n          <span class=\"popup-amount-label\">{l}</span>"))
                .unwrap_or_default();
            format!(
                r#"        <div class="popup-amount">
          <img class="popup-amount-icon" src="{icon}" alt="">
          <span class="popup-amount-value {color_class}">{value}</span>{label}
        </div>"#,
                icon = field(amount, "icon"),
                value = field(amount, "value"),
            )
        })
        .collect();
    let amounts_html = blocks.join("\n        <span class=\"popup-amount-separator\">+</span>\n");

    let scatter = config.get("scatterImages").cloned().unwrap_or(ConfigValue::Null);
    let cta = config.require_map("cta")?;

    Ok(format!(
        r#"<div class="popup-overlay active">
  <div class="popup-container popup-special-offer">
    <div class="popup-bg-svg">
      <img src="{bg}" alt="">
    </div>
    <button class="popup-close" aria-label="Close">
      {CLOSE_SVG}
    </button>
    <h2 class="popup-title">{title}</h2>
    <div class="popup-hero popup-hero--animated">
      <img class="popup-scatter scatter-tl" src="{tl}" alt="">
      <img class="popup-scatter scatter-mr" src="{mr}" alt="">
      <img class="popup-scatter scatter-br" src="{br}" alt="">
      <img class="popup-hero-main" src="{hero}" alt="">
    </div>
    <div class="popup-content">
      <p class="popup-subtitle">{subtitle}</p>
      <div class="popup-amounts">
{amounts_html}
      </div>
      <button class="popup-cta">{cta_text}</button>
    </div>
  </div>
</div>"#,
        bg = field(config, "bgSvg"),
        title = field(config, "title"),
        tl = field(&scatter, "tl"),
        mr = field(&scatter, "mr"),
        br = field(&scatter, "br"),
        hero = field(config, "heroImage"),
        subtitle = field(config, "subtitle"),
        cta_text = field(cta, "text"),
    ))
}

// ---------------------------------------------------------------------------
// Free Coins V1

fn free_coins_v1() -> Template {
    let defaults = ConfigValue::map([
        ("heroImage", s("assets/images/pot-of-gold.png")),
        ("titleImage", s("assets/images/claim-title.png")),
        ("subtitle", s("You have coins waiting for you!")),
        (
            "currencies",
            ConfigValue::Seq(vec![ConfigValue::map([
                ("icon", s("assets/images/sc-coin.png")),
                ("value", s("1")),
                ("label", s("FOR FREE")),
            ])]),
        ),
        ("cta", ConfigValue::map([("text", s("Claim Now"))])),
        ("claimCoinImage", s(DEFAULT_CLAIM_COIN)),
    ]);
    Template::new("Free Coins V1", defaults, render_free_coins_v1)
        .with_interaction(InteractionDescriptor::toggle_claimed("cta-v1", CLAIM_RESET))
}

fn render_free_coins_v1(config: &ConfigValue) -> Result<String, RenderFault> {
    let rows: Vec<String> = config
        .seq_or_empty("currencies")?
        .iter()
        .map(|currency| {
            let label = currency
                .text_field("label")
                .filter(|l| !l.is_empty())
                .map(|l| format!("\n          <span class=\"popup-currency-label\">{l}</span>"))
                .unwrap_or_default();
            format!(
                r#"        <div class="popup-currency-row">
          <img class="popup-currency-icon" src="{icon}" alt="">
          <span class="popup-currency-value">{value}</span>{label}
        </div>"#,
                icon = field(currency, "icon"),
                value = field(currency, "value"),
            )
        })
        .collect();

    let title_html = config
        .text_field("titleImage")
        .filter(|t| !t.is_empty())
        .map(|src| {
            format!(r#"<img class="popup-title-image" src="{src}" alt="CLAIM YOUR FREE COINS!">"#)
        })
        .unwrap_or_default();

    let cta = config.require_map("cta")?;
    let coin = config.text_or("claimCoinImage", DEFAULT_CLAIM_COIN);

    Ok(format!(
        r#"<div class="popup-overlay active">
  <div class="popup-container popup-free-coins">
    <button class="popup-close" aria-label="Close">
      {CLOSE_SVG}
    </button>
    <div class="popup-hero popup-hero--animated">
      <img src="{hero}" alt="">
    </div>
    {title_html}
    <div class="popup-content">
      <p class="popup-subtitle">{subtitle}</p>
      <div class="popup-currencies">
{rows}
      </div>
      <button class="popup-cta" id="cta-v1">
{coins}
        <span>{cta_text}</span>
      </button>
    </div>
  </div>
</div>"#,
        hero = field(config, "heroImage"),
        subtitle = field(config, "subtitle"),
        rows = rows.join("\n"),
        coins = coin_fountain(&coin),
        cta_text = field(cta, "text"),
    ))
}

// ---------------------------------------------------------------------------
// Free Coins V2 (login rewards)

fn free_coins_v2() -> Template {
    let defaults = ConfigValue::map([
        ("title", s("LOGIN REWARDS")),
        ("subtitle", s("SHOW UP DAILY - AND CLAIM YOUR REWARDS")),
        ("heroImage", s("assets/images/gift-box.png")),
        (
            "scatterImages",
            ConfigValue::map([
                ("tl", s("assets/images/sc-coins-scatter1.png")),
                ("mr", s("assets/images/sc-coins-scatter2.png")),
                ("tr", s("assets/images/roo-coins-scatter.png")),
            ]),
        ),
        (
            "cta",
            ConfigValue::map([
                ("text", s("Claim 1 SC")),
                ("icon", s("assets/images/sc-coin.png")),
            ]),
        ),
        ("claimCoinImage", s(DEFAULT_CLAIM_COIN)),
    ]);
    Template::new("Free Coins V2", defaults, render_free_coins_v2)
        .with_interaction(InteractionDescriptor::toggle_claimed("cta-v2", CLAIM_RESET))
}

fn render_free_coins_v2(config: &ConfigValue) -> Result<String, RenderFault> {
    let scatter = config.get("scatterImages").cloned().unwrap_or(ConfigValue::Null);
    let cta = config.require_map("cta")?;
    let cta_icon = cta
        .text_field("icon")
        .filter(|i| !i.is_empty())
        .map(|src| format!("\n        <img class=\"popup-cta-icon\" src=\"{src}\" alt=\"\">"))
        .unwrap_or_default();
    let coin = config.text_or("claimCoinImage", DEFAULT_CLAIM_COIN);

    Ok(format!(
        r#"<div class="popup-overlay active">
  <div class="popup-container popup-free-coins-v2">
    <button class="popup-close" aria-label="Close">
      {CLOSE_SVG}
    </button>
    <h2 class="popup-title">{title}</h2>
    <div class="popup-hero popup-hero--animated">
      <img class="popup-scatter scatter-tl" src="{tl}" alt="">
      <img class="popup-scatter scatter-mr" src="{mr}" alt="">
      <img class="popup-scatter scatter-tr" src="{tr}" alt="">
      <img class="popup-hero-main" src="{hero}" alt="">
    </div>
    <div class="popup-content">
      <p class="popup-subtitle">{subtitle}</p>
      <button class="popup-cta" id="cta-v2">
{coins}{cta_icon}
        <span>{cta_text}</span>
      </button>
    </div>
  </div>
</div>"#,
        title = field(config, "title"),
        tl = field(&scatter, "tl"),
        mr = field(&scatter, "mr"),
        tr = field(&scatter, "tr"),
        hero = field(config, "heroImage"),
        subtitle = field(config, "subtitle"),
        coins = coin_fountain(&coin),
        cta_text = field(cta, "text"),
    ))
}

/// Optional text field, empty when missing
fn field(value: &ConfigValue, key: &str) -> String {
    value.text_field(key).unwrap_or_default()
}

fn coin_fountain(coin: &str) -> String {
    COIN_FOUNTAIN
        .iter()
        .map(|(offset, delay)| {
            format!(
                r#"        <img class="popup-claim-coin" src="{coin}" alt="" style="--coin-x: calc(-50% + {offset}px); animation-delay: {delay};">"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Inline stylesheet fragments, layered over the shared base rules

const SPECIAL_OFFER_CSS: &str = r#".popup-special-offer {
  background: linear-gradient(180deg, #3b1d8f 0%, #1c0b4a 100%);
}
.popup-special-offer .popup-bg-svg {
  position: absolute;
  inset: 0;
  overflow: hidden;
  border-radius: inherit;
  pointer-events: none;
}
.popup-special-offer .popup-bg-svg img {
  width: 100%;
  height: 100%;
  object-fit: cover;
  opacity: 0.6;
}
.popup-amounts {
  display: flex;
  align-items: center;
  justify-content: center;
  gap: 10px;
  margin: 12px 0 18px;
}
.popup-amount {
  display: flex;
  align-items: center;
  gap: 6px;
}
.popup-amount-icon {
  width: 32px;
  height: 32px;
}
.popup-amount-value {
  font-size: 26px;
  font-weight: 900;
}
.popup-amount-value--gc {
  color: #ffd23f;
}
.popup-amount-value--sc {
  color: #3ee07a;
}
.popup-amount-label {
  font-size: 11px;
  font-weight: 800;
  line-height: 1.1;
  white-space: pre-line;
}
.popup-amount-separator {
  font-size: 22px;
  font-weight: 800;
  opacity: 0.8;
}
.scatter-br {
  right: 4%;
  bottom: 0;
}"#;

const FREE_COINS_V1_CSS: &str = r#".popup-free-coins {
  background: radial-gradient(circle at 50% 20%, #1f7a46 0%, #0c3320 70%);
}
.popup-title-image {
  display: block;
  width: 82%;
  margin: -12px auto 4px;
}
.popup-currencies {
  display: flex;
  flex-direction: column;
  align-items: center;
  gap: 6px;
  margin: 10px 0 18px;
}
.popup-currency-row {
  display: flex;
  align-items: center;
  gap: 8px;
}
.popup-currency-icon {
  width: 30px;
  height: 30px;
}
.popup-currency-value {
  font-size: 28px;
  font-weight: 900;
  color: #3ee07a;
}
.popup-currency-label {
  font-size: 13px;
  font-weight: 800;
}"#;

const FREE_COINS_V2_CSS: &str = r#".popup-free-coins-v2 {
  background: linear-gradient(180deg, #0f4c81 0%, #08213d 100%);
}
.popup-free-coins-v2 .popup-subtitle {
  margin-bottom: 20px;
}
.popup-cta-icon {
  width: 22px;
  height: 22px;
  margin-right: 6px;
  vertical-align: middle;
}
.scatter-tr {
  top: 6%;
  right: 6%;
}"#;
