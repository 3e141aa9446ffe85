//! Render a `MetricRecord` into the destination database's line protocol.
//!
//! Rendering is deterministic and side-effect free: one line per sample, all
//! samples of a record sharing a single tag segment. The delivery layer gets
//! back a fully formed payload and nothing else.

use metric::{MetricRecord, TagMap};

/// Render the tag segment shared by every line of a record.
///
/// Tags with empty values are dropped. Commas inside a tag value collide
/// with the wire format's field separator and are escaped to pipes. The
/// `cluster` identifier is always appended last; `source` follows it only
/// when non-empty.
#[inline]
pub fn render_tags(tags: &TagMap, cluster: &str, source: &str, s: &mut String) {
    for &(ref name, ref val) in tags.iter() {
        if val.is_empty() {
            continue;
        }
        s.push_str(name);
        s.push('=');
        for c in val.chars() {
            s.push(if c == ',' { '|' } else { c });
        }
        s.push(',');
    }
    s.push_str("cluster=");
    s.push_str(cluster);
    if !source.is_empty() {
        s.push_str(",source=");
        s.push_str(source);
    }
}

/// Render a record into a newline terminated line protocol payload.
///
/// Sample names have spaces replaced with underscores since the wire format
/// disallows unescaped spaces in the identifier segment. A record with zero
/// samples renders to the empty string; callers treat that as a no-op.
pub fn render_record(record: &MetricRecord, cluster: &str, source: &str) -> String {
    let mut tag_buf = String::with_capacity(256);
    render_tags(record.tags(), cluster, source, &mut tag_buf);

    let mut lines = String::with_capacity(1_024);
    for metric in record.metrics() {
        for c in metric.name.chars() {
            lines.push(if c == ' ' { '_' } else { c });
        }
        lines.push(',');
        lines.push_str(&tag_buf);
        lines.push(' ');
        lines.push_str("value=");
        lines.push_str(&clamp(metric.value).to_string());
        lines.push('\n');
    }
    lines
}

// The destination's numeric encoding cannot represent -0 distinctly, which
// shows up as charting artifacts downstream. Values truncate to an integer
// magnitude first, then clamp below zero to 0.
#[inline]
fn clamp(value: f64) -> i64 {
    let magnitude = value as i64;
    if magnitude < 0 {
        0
    } else {
        magnitude
    }
}
