//! Page shells and form pages.

use geodash_core::config::ViewConfig;
use geodash_core::models::{Facility, Lang, UserAccount};
use geodash_core::view::ViewState;

use crate::render::{chart, map};

/// Escape text for HTML body and attribute positions.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn inline_css() -> &'static str {
    r#"
    body { font-family: "Segoe UI", Arial, sans-serif; margin: 0; background: #10141a; color: #e6e6e6; }
    header { background: #1a2230; padding: 0.8rem 1.5rem; display: flex; justify-content: space-between; align-items: center; }
    header a { color: #9ecbff; text-decoration: none; margin-left: 1rem; }
    main { padding: 1.5rem; }
    h1 { font-size: 1.4rem; }
    .panel { background: #1a2230; border-radius: 6px; padding: 1rem; margin-bottom: 1rem; }
    .columns { display: flex; gap: 1rem; flex-wrap: wrap; }
    .columns > div { flex: 1 1 480px; }
    form.inline label { display: block; margin: 0.4rem 0 0.1rem; }
    input, select { background: #0e1218; color: #e6e6e6; border: 1px solid #32405a; border-radius: 4px; padding: 0.35rem; }
    button { background: #2b6cb0; color: white; border: 0; border-radius: 4px; padding: 0.45rem 1rem; cursor: pointer; }
    table.data { border-collapse: collapse; width: 100%; }
    table.data th, table.data td { border-bottom: 1px solid #2a3548; padding: 0.35rem 0.5rem; text-align: left; }
    tr.selected { background: #2b3d5c; }
    .swatch { display: inline-block; width: 0.9rem; height: 0.9rem; border-radius: 2px; margin-right: 0.4rem; vertical-align: middle; }
    .error { color: #ff8787; }
    .notice { color: #ffd479; }
    .legend { display: flex; gap: 0.6rem; margin-top: 0.5rem; flex-wrap: wrap; }
    .legend span { font-size: 0.8rem; }
    "#
}

/// Common document shell.
pub fn layout(title: &str, lang: Lang, user: Option<&str>, body: &str) -> String {
    let (html_lang, dir) = match lang {
        Lang::Fr => ("fr", "ltr"),
        Lang::Ar => ("ar", "rtl"),
    };
    let session_bar = match user {
        Some(username) => format!(
            r#"<span>{}</span><form method="post" action="/logout" style="display:inline"><button>Logout</button></form>"#,
            escape_html(username)
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="{html_lang}" dir="{dir}">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>{css}</style>
</head>
<body>
<header><strong>GeoDash</strong><nav>{session_bar}</nav></header>
<main>
{body}
</main>
</body>
</html>"#,
        html_lang = html_lang,
        dir = dir,
        title = escape_html(title),
        css = inline_css(),
        session_bar = session_bar,
        body = body,
    )
}

/// The shared login page; the verified role decides the destination.
pub fn login_page(error: Option<&str>) -> String {
    let error_html = error
        .map(|e| format!(r#"<p class="error">{}</p>"#, escape_html(e)))
        .unwrap_or_default();

    let body = format!(
        r#"<div class="panel" style="max-width: 24rem; margin: 3rem auto;">
<h1>Connexion</h1>
{error_html}
<form class="inline" method="post" action="/login">
<label>Nom d'utilisateur</label>
<input name="username" required>
<label>Mot de passe</label>
<input name="password" type="password" required>
<p><button>Se connecter</button></p>
</form>
</div>"#,
    );
    layout("Connexion", Lang::Fr, None, &body)
}

/// Client portal: list of configured dashboard views.
pub fn view_list_page(username: &str, views: &[ViewConfig]) -> String {
    let items: String = views
        .iter()
        .map(|v| {
            format!(
                r#"<li><a href="/dashboard/{slug}">{title}</a></li>"#,
                slug = escape_html(&v.slug),
                title = escape_html(&v.title_fr),
            )
        })
        .collect();

    let body = format!(
        r#"<div class="panel"><h1>Tableaux de bord</h1><ul>{items}</ul></div>"#,
    );
    layout("Tableaux de bord", Lang::Fr, Some(username), &body)
}

/// The main dashboard page: selector, map, chart and ranked table, all
/// rendered from one `ViewState`.
pub fn dashboard_page(username: &str, state: &ViewState) -> String {
    let lang_value = match state.lang {
        Lang::Fr => "fr",
        Lang::Ar => "ar",
    };

    let options: String = state
        .selector
        .iter()
        .map(|option| {
            format!(
                r#"<option value="{code}"{selected}>{code} — {label}</option>"#,
                code = escape_html(option.code.as_str()),
                label = escape_html(&option.label),
                selected = if option.selected { " selected" } else { "" },
            )
        })
        .collect();

    let (top, bottom) = state.choropleth.top_bottom(2);
    let summary_item = |row: &geodash_core::viz::RegionRow| {
        format!(
            "<li>{}: <code>{}</code></li>",
            escape_html(&row.name),
            row.value.map(|v| format!("{v}")).unwrap_or_default()
        )
    };
    let top_html: String = top.iter().map(|r| summary_item(r)).collect();
    let bottom_html: String = bottom.iter().map(|r| summary_item(r)).collect();

    let legend_html: String = state
        .choropleth
        .legend(5)
        .iter()
        .map(|stop| {
            format!(
                r#"<span><i class="swatch" style="background:{}"></i>{:.1}</span>"#,
                stop.color.to_hex(),
                stop.value
            )
        })
        .collect();

    let table_rows: String = state
        .choropleth
        .ranked()
        .iter()
        .map(|row| {
            let selected = state.selected_region == Some(row.index);
            format!(
                r#"<tr{class}><td><i class="swatch" style="background:{color}"></i>{name}</td><td>{value}</td></tr>"#,
                class = if selected { r#" class="selected""# } else { "" },
                color = row.color.to_hex(),
                name = escape_html(&row.name),
                value = row.value.map(|v| format!("{v}")).unwrap_or_default(),
            )
        })
        .collect();

    let body = format!(
        r#"<h1>{title}</h1>
<div class="panel">
<form method="get" action="/dashboard/{slug}">
<label>Indice:
<select name="metric" onchange="this.form.submit()">{options}</select>
</label>
<label>Langue:
<select name="lang" onchange="this.form.submit()">
<option value="fr"{fr_sel}>Français</option>
<option value="ar"{ar_sel}>العربية</option>
</select>
</label>
</form>
<div class="legend">{legend}</div>
</div>
<div class="columns">
<div class="panel">{map}</div>
<div class="panel">{chart}
<div class="columns">
<div><h3>🔼</h3><ul>{top}</ul></div>
<div><h3>🔻</h3><ul>{bottom}</ul></div>
</div>
</div>
</div>
<div class="panel">
<table class="data"><thead><tr><th>{name_header}</th><th>{label}</th></tr></thead>
<tbody>{rows}</tbody></table>
</div>"#,
        title = escape_html(&state.title),
        slug = escape_html(&state.slug),
        options = options,
        fr_sel = if state.lang == Lang::Fr { " selected" } else { "" },
        ar_sel = if state.lang == Lang::Ar { " selected" } else { "" },
        legend = legend_html,
        map = map::leaflet_map(state, lang_value),
        chart = chart::bar_chart(state),
        top = top_html,
        bottom = bottom_html,
        name_header = match state.lang {
            Lang::Fr => "Commune",
            Lang::Ar => "الجماعة",
        },
        label = escape_html(&state.metric_label),
        rows = table_rows,
    );

    layout(&state.title, state.lang, Some(username), &body)
}

/// Admin portal home: facility entry form plus the current records.
pub fn admin_page(username: &str, facilities: &[Facility], manage_users: bool, notice: Option<&str>) -> String {
    let notice_html = notice
        .map(|n| format!(r#"<p class="notice">{}</p>"#, escape_html(n)))
        .unwrap_or_default();

    let users_link = if manage_users {
        r#"<p><a href="/admin/users">👥 Gestion des comptes</a></p>"#
    } else {
        ""
    };

    let rows: String = facilities
        .iter()
        .map(|f| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.5}</td><td>{:.5}</td></tr>",
                escape_html(&f.province),
                escape_html(&f.commune),
                escape_html(&f.kind),
                escape_html(&f.name),
                f.latitude,
                f.longitude,
            )
        })
        .collect();

    let body = format!(
        r#"<h1>📥 Saisie des équipements</h1>
{notice_html}
{users_link}
<div class="columns">
<div class="panel">
<form class="inline" method="post" action="/admin/facilities">
<label>Province</label><input name="province" required>
<label>Commune</label><input name="commune" required>
<label>Type</label><input name="kind" required>
<label>Nom</label><input name="name" required>
<label>Latitude</label><input name="latitude" type="number" step="any" required>
<label>Longitude</label><input name="longitude" type="number" step="any" required>
<p><button>Ajouter</button></p>
</form>
</div>
<div class="panel">
<table class="data">
<thead><tr><th>Province</th><th>Commune</th><th>Type</th><th>Nom</th><th>Lat</th><th>Lng</th></tr></thead>
<tbody>{rows}</tbody>
</table>
</div>
</div>"#,
    );
    layout("Saisie des équipements", Lang::Fr, Some(username), &body)
}

/// Admin-only user management page.
pub fn users_page(username: &str, users: &[UserAccount], notice: Option<&str>) -> String {
    let notice_html = notice
        .map(|n| format!(r#"<p class="notice">{}</p>"#, escape_html(n)))
        .unwrap_or_default();

    let rows: String = users
        .iter()
        .map(|u| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&u.username),
                escape_html(&u.email),
                u.role,
            )
        })
        .collect();

    let body = format!(
        r#"<h1>👥 Gestion des comptes</h1>
{notice_html}
<p><a href="/admin">← Retour</a></p>
<div class="columns">
<div class="panel">
<form class="inline" method="post" action="/admin/users">
<label>Nom d'utilisateur</label><input name="username" required>
<label>Email</label><input name="email" type="email" required>
<label>Mot de passe</label><input name="password" type="password" required>
<label>Rôle</label>
<select name="role">
<option value="admin">admin</option>
<option value="editor">editor</option>
<option value="client">client</option>
</select>
<p><button>Créer</button></p>
</form>
</div>
<div class="panel">
<table class="data">
<thead><tr><th>Utilisateur</th><th>Email</th><th>Rôle</th></tr></thead>
<tbody>{rows}</tbody>
</table>
</div>
</div>"#,
    );
    layout("Gestion des comptes", Lang::Fr, Some(username), &body)
}

/// Minimal error document used by `ApiError`.
pub fn error_page(message: &str, details: Option<&str>) -> String {
    let details_html = details
        .map(|d| format!("<p><small>{}</small></p>", escape_html(d)))
        .unwrap_or_default();
    let body = format!(
        r#"<div class="panel"><h1 class="error">{}</h1>{}<p><a href="/">← Accueil</a></p></div>"#,
        escape_html(message),
        details_html
    );
    layout("Erreur", Lang::Fr, None, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"a" & 'b'</b>"#),
            "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_login_page_shows_error() {
        let html = login_page(Some("Invalid credentials"));
        assert!(html.contains("Invalid credentials"));
        assert!(html.contains("<form"));
    }

    #[test]
    fn test_layout_direction_follows_lang() {
        assert!(layout("t", Lang::Ar, None, "").contains(r#"dir="rtl""#));
        assert!(layout("t", Lang::Fr, None, "").contains(r#"dir="ltr""#));
    }
}
