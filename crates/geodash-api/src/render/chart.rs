//! Inline SVG bar chart, colored by the same scale as the map.

use geodash_core::models::Lang;
use geodash_core::view::ViewState;

use crate::render::page::escape_html;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 360.0;
const MARGIN_LEFT: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 70.0;
const MARGIN_TOP: f64 = 16.0;

struct MeanLine {
    value: f64,
    label_fr: &'static str,
    label_ar: &'static str,
    color: &'static str,
}

/// Render the companion bar chart for a dashboard page. Bars reuse each
/// region's precomputed fill; reference means draw as labeled rule lines.
pub fn bar_chart(state: &ViewState) -> String {
    let ranked = state.choropleth.ranked();
    if ranked.is_empty() {
        return format!(
            r#"<p class="notice">{}</p>"#,
            match state.lang {
                Lang::Fr => "Pas de données numériques pour cet indice.",
                Lang::Ar => "لا توجد بيانات رقمية لهذا المؤشر.",
            }
        );
    }

    let mean_lines: Vec<MeanLine> = [
        (state.means.national, "Moyenne nationale", "المتوسط الوطني", "#ffffff"),
        (state.means.regional, "Moyenne régionale", "المتوسط الجهوي", "#4d9de0"),
        (state.means.provincial, "Moyenne provinciale", "المتوسط الإقليمي", "#ffd479"),
    ]
    .into_iter()
    .filter_map(|(value, label_fr, label_ar, color)| {
        value.map(|value| MeanLine { value, label_fr, label_ar, color })
    })
    .collect();

    // The value axis spans the data and every reference line.
    let data_max = ranked.iter().filter_map(|r| r.value).fold(0.0_f64, f64::max);
    let max = mean_lines
        .iter()
        .map(|m| m.value)
        .fold(data_max, f64::max)
        .max(1e-9);

    let plot_width = WIDTH - MARGIN_LEFT - 10.0;
    let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_height;
    let slot = plot_width / ranked.len() as f64;
    let bar_width = (slot * 0.8).min(48.0);

    let y_for = |value: f64| baseline - (value.max(0.0) / max) * plot_height;

    let mut bars = String::new();
    for (i, row) in ranked.iter().enumerate() {
        let value = row.value.unwrap_or(0.0);
        let x = MARGIN_LEFT + i as f64 * slot + (slot - bar_width) / 2.0;
        let y = y_for(value);
        let selected = state.selected_region == Some(row.index);

        bars.push_str(&format!(
            r##"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{fill}"{stroke}><title>{name}: {value}</title></rect>
<text x="{label_x:.1}" y="{label_y:.1}" transform="rotate(-40 {label_x:.1} {label_y:.1})" text-anchor="end" font-size="10" fill="#c9c9c9">{name}</text>
"##,
            x = x,
            y = y,
            w = bar_width,
            h = baseline - y,
            fill = row.color.to_hex(),
            stroke = if selected { r##" stroke="#ffffff" stroke-width="2""## } else { "" },
            name = escape_html(&row.name),
            value = value,
            label_x = x + bar_width / 2.0,
            label_y = baseline + 12.0,
        ));
    }

    let mut rules = String::new();
    for (i, mean) in mean_lines.iter().enumerate() {
        let y = y_for(mean.value);
        let label = match state.lang {
            Lang::Fr => mean.label_fr,
            Lang::Ar => mean.label_ar,
        };
        rules.push_str(&format!(
            r#"<line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="{color}" stroke-width="2" stroke-dasharray="6 3"/>
<text x="{x1:.1}" y="{ty:.1}" font-size="11" font-weight="bold" fill="{color}">{label}</text>
"#,
            x1 = MARGIN_LEFT + 2.0,
            x2 = WIDTH - 10.0,
            y = y,
            ty = y - 4.0 - (i as f64),
            color = mean.color,
            label = label,
        ));
    }

    // Value axis: baseline, max tick and mid tick.
    let axis = format!(
        r##"<line x1="{left:.1}" y1="{top:.1}" x2="{left:.1}" y2="{baseline:.1}" stroke="#5a6a85"/>
<line x1="{left:.1}" y1="{baseline:.1}" x2="{right:.1}" y2="{baseline:.1}" stroke="#5a6a85"/>
<text x="{tick_x:.1}" y="{top_t:.1}" text-anchor="end" font-size="10" fill="#c9c9c9">{max:.1}</text>
<text x="{tick_x:.1}" y="{mid_t:.1}" text-anchor="end" font-size="10" fill="#c9c9c9">{mid:.1}</text>
<text x="{tick_x:.1}" y="{baseline:.1}" text-anchor="end" font-size="10" fill="#c9c9c9">0</text>
"##,
        left = MARGIN_LEFT,
        right = WIDTH - 10.0,
        top = MARGIN_TOP,
        baseline = baseline,
        tick_x = MARGIN_LEFT - 6.0,
        top_t = MARGIN_TOP + 4.0,
        mid_t = MARGIN_TOP + plot_height / 2.0 + 4.0,
        max = max,
        mid = max / 2.0,
    );

    format!(
        r#"<h3>📊 {title}</h3>
<svg viewBox="0 0 {width} {height}" role="img" style="width: 100%; height: auto;">
{axis}{bars}{rules}</svg>"#,
        title = escape_html(&state.metric_label),
        width = WIDTH,
        height = HEIGHT,
        axis = axis,
        bars = bars,
        rules = rules,
    )
}
