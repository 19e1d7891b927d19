//! Leaflet map generation.
//!
//! The choropleth GeoJSON is embedded inline with each feature's fill color
//! precomputed from the shared scale, so the map and the chart cannot drift
//! apart. Overlay layers render as circle markers; a map click navigates to
//! the server-side hit-test endpoint.

use geodash_core::view::ViewState;
use geodash_core::viz::NEUTRAL_COLOR;
use serde_json::json;

/// Render the map widget for a dashboard page.
pub fn leaflet_map(state: &ViewState, lang_value: &str) -> String {
    let features: Vec<serde_json::Value> = state
        .choropleth
        .rows
        .iter()
        .filter_map(|row| {
            let geometry = state.region_geometry(row.index)?;
            Some(json!({
                "type": "Feature",
                "geometry": geometry,
                "properties": {
                    "name": row.name,
                    "value": row.value,
                    "fill": row.color.to_hex(),
                    "selected": state.selected_region == Some(row.index),
                }
            }))
        })
        .collect();

    let collection = json!({ "type": "FeatureCollection", "features": features });

    let overlays: Vec<serde_json::Value> = state
        .overlays
        .iter()
        .map(|layer| {
            let points: Vec<serde_json::Value> = layer
                .dataset
                .features
                .iter()
                .filter_map(|feature| {
                    let geometry = feature.geometry.as_ref()?;
                    let label = layer
                        .label_column
                        .as_deref()
                        .map(|column| feature.text(column))
                        .unwrap_or_default();
                    Some(json!({
                        "geometry": geometry.to_geojson(),
                        "label": label,
                    }))
                })
                .collect();
            json!({ "name": layer.name, "points": points })
        })
        .collect();

    let click_js = if state.click_select {
        format!(
            "map.on('click', function (e) {{\n\
             window.location = '/dashboard/{slug}/select?lng=' + e.latlng.lng + '&lat=' + e.latlng.lat + '&metric={metric}&lang={lang}';\n\
             }});",
            slug = state.slug,
            metric = state.metric,
            lang = lang_value,
        )
    } else {
        String::new()
    };

    format!(
        r#"<div id="map" style="height: 480px;"></div>
<script>
var map = L.map('map').setView([{lat}, {lng}], {zoom});
L.tileLayer('https://{{s}}.basemaps.cartocdn.com/light_all/{{z}}/{{x}}/{{y}}.png',
    {{ attribution: '&copy; OpenStreetMap &middot; CartoDB' }}).addTo(map);

var communes = {collection};
L.geoJSON(communes, {{
    style: function (feature) {{
        return {{
            fillColor: feature.properties.fill || '{neutral}',
            color: feature.properties.selected ? '#ffffff' : 'black',
            weight: feature.properties.selected ? 2.5 : 0.5,
            fillOpacity: 0.7
        }};
    }},
    onEachFeature: function (feature, layer) {{
        layer.bindTooltip(feature.properties.name + ': ' +
            (feature.properties.value === null ? '—' : feature.properties.value));
    }}
}}).addTo(map);

var overlays = {overlays};
overlays.forEach(function (group) {{
    var fg = L.featureGroup();
    group.points.forEach(function (p) {{
        if (!p.geometry || p.geometry.type !== 'Point') {{ return; }}
        var c = p.geometry.coordinates;
        L.circleMarker([c[1], c[0]], {{ radius: 5, color: 'darkgreen', fillOpacity: 0.8 }})
            .bindTooltip(p.label || group.name)
            .addTo(fg);
    }});
    fg.addTo(map);
}});

{click_js}
</script>"#,
        lat = state.center[0],
        lng = state.center[1],
        zoom = state.zoom,
        collection = collection,
        neutral = NEUTRAL_COLOR.to_hex(),
        overlays = serde_json::Value::Array(overlays),
        click_js = click_js,
    )
}
