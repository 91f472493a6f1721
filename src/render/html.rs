use crate::model::{ReportData, TimelineData};
use serde::Serialize;

/// Render the batch report: per dataset, normalized throughput against average CPU,
/// network and disk usage, one line per benchmark with points labelled by scale.
pub fn render_report_html(data: &ReportData) -> anyhow::Result<String> {
    const TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Cache benchmark report</title>
__STYLE__
</head>
<body>
<header>
  <div class="summary" id="summary"></div>
</header>
<div class="main">
  <div id="datasets"></div>
  <h2>Failures</h2>
  <table id="failTable">
    <thead>
      <tr><th>dataset</th><th>benchmark</th><th class="num">scale</th><th>kind</th><th>message</th></tr>
    </thead>
    <tbody id="failBody"></tbody>
  </table>
</div>
<script>
const DATA = __DATA__;
__CHART_JS__

function benchLabel(b) { return DATA.benchmark_labels[b] || b; }
function datasetLabel(d) { return DATA.dataset_aliases[d] || d; }

function renderSummary() {
  const t = DATA.totals;
  document.getElementById("summary").innerHTML = `
    <span class="pill">combinations: <b>${t.combinations}</b></span>
    <span class="pill">summarized: <b>${t.succeeded}</b></span>
    <span class="pill">failed: <b>${t.failed}</b></span>
  `;
}

const METRICS = [
  ["avg_cpu_pct", "Avg. CPU Util. (%)"],
  ["avg_network_mb", "Avg. NW Usage (MB/s)"],
  ["avg_disk_mb", "Avg. Disk Usage (MB/s)"],
];

function renderDatasets() {
  const root = document.getElementById("datasets");
  for (const ds of DATA.datasets) {
    const runs = DATA.runs.filter(r => r.dataset === ds);
    if (!runs.length) continue;

    const section = document.createElement("section");
    section.innerHTML = `<h2>${escapeHtml(datasetLabel(ds))}</h2>`;
    const row = document.createElement("div");
    row.className = "charts";
    section.appendChild(row);

    const benches = [...new Set(runs.map(r => r.benchmark))];
    for (const [key, title] of METRICS) {
      const series = benches.map((b, i) => ({
        name: benchLabel(b),
        color: PALETTE[i % PALETTE.length],
        marker: true,
        points: runs
          .filter(r => r.benchmark === b && r.summary[key] !== null)
          .sort((x, y) => x.scale - y.scale)
          .map(r => [r.normalized_throughput_pct, r.summary[key], String(r.scale)]),
      })).filter(s => s.points.length);
      if (!series.length) continue;

      const box = document.createElement("div");
      row.appendChild(box);
      lineChart(box, { xLabel: "Norm. Throughput (%)", yLabel: title, series });
    }
    root.appendChild(section);
  }
}

function renderFailures() {
  const body = document.getElementById("failBody");
  if (!DATA.failures.length) {
    document.getElementById("failTable").style.display = "none";
    return;
  }
  for (const f of DATA.failures) {
    const tr = document.createElement("tr");
    tr.innerHTML = `
      <td>${escapeHtml(f.dataset)}</td>
      <td>${escapeHtml(benchLabel(f.benchmark))}</td>
      <td class="num">${f.scale}</td>
      <td><code>${escapeHtml(f.kind)}</code></td>
      <td>${escapeHtml(f.message)}</td>
    `;
    body.appendChild(tr);
  }
}

renderSummary();
renderDatasets();
renderFailures();
</script>
</body>
</html>
"#;

    fill_template(TEMPLATE, data)
}

/// Render one run's timeline: network traffic on the left axis, CPU on the right.
pub fn render_timeline_html(data: &TimelineData) -> anyhow::Result<String> {
    const TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Run timeline</title>
__STYLE__
</head>
<body>
<header>
  <div class="summary" id="summary"></div>
</header>
<div class="main">
  <div class="charts" id="charts"></div>
</div>
<script>
const DATA = __DATA__;
__CHART_JS__

function zip(xs, ys) { return xs.map((x, i) => [x, ys[i]]); }

const last = DATA.elapsed_secs.length ? DATA.elapsed_secs[DATA.elapsed_secs.length - 1] : 0;
document.getElementById("summary").innerHTML = `
  <span class="pill"><b>${escapeHtml(DATA.title)}</b></span>
  <span class="pill">format: <b>${DATA.format}</b></span>
  <span class="pill">samples: <b>${DATA.elapsed_secs.length}</b></span>
  <span class="pill">duration: <b>${last} s</b></span>
  <span class="pill muted">${escapeHtml(DATA.path)}</span>
`;

const charts = document.getElementById("charts");

const net = document.createElement("div");
charts.appendChild(net);
lineChart(net, {
  xLabel: "Time (s)",
  yLabel: "Network Traffic (MB/s)",
  series: [
    { name: "Recv (MB/s)", color: "green", points: zip(DATA.elapsed_secs, DATA.net_recv_mb) },
    { name: "Send (MB/s)", color: "red", points: zip(DATA.elapsed_secs, DATA.net_send_mb) },
  ],
  right: {
    label: "CPU Utilization (%)",
    series: [
      { name: "CPU Utilization (%)", color: "blue", dashed: true, points: zip(DATA.elapsed_secs, DATA.cpu_pct) },
    ],
  },
});

if (DATA.disk_read_mb && DATA.disk_write_mb) {
  const disk = document.createElement("div");
  charts.appendChild(disk);
  lineChart(disk, {
    xLabel: "Time (s)",
    yLabel: "Disk I/O (MB/s)",
    series: [
      { name: "Read (MB/s)", color: PALETTE[1], points: zip(DATA.elapsed_secs, DATA.disk_read_mb) },
      { name: "Write (MB/s)", color: PALETTE[5], points: zip(DATA.elapsed_secs, DATA.disk_write_mb) },
    ],
  });
}
</script>
</body>
</html>
"#;

    fill_template(TEMPLATE, data)
}

fn fill_template<T: Serialize>(template: &str, data: &T) -> anyhow::Result<String> {
    // Embedded as a JS object literal; "</" would close the script element early.
    let json = serde_json::to_string(data)?.replace("</", "<\\/");

    Ok(template
        .replace("__STYLE__", STYLE)
        .replace("__CHART_JS__", CHART_JS)
        .replace("__DATA__", &json))
}

const STYLE: &str = r#"<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  .main { padding: 12px 16px; }
  .summary { display: flex; gap: 16px; flex-wrap: wrap; font-size: 14px; color: #333; }
  .pill { padding: 4px 8px; border: 1px solid #ddd; border-radius: 999px; background: #fafafa; }
  .muted { color: #777; font-size: 12px; }
  .charts { display: flex; gap: 16px; flex-wrap: wrap; }
  .chart text { font-size: 12px; fill: #333; }
  .chart .grid { stroke: #eee; }
  .chart .axis { stroke: #999; }
  table { border-collapse: collapse; width: 100%; margin-top: 8px; }
  th, td { border-bottom: 1px solid #eee; padding: 6px 8px; text-align: left; font-size: 14px; }
  th { background: white; border-bottom: 1px solid #ddd; }
  .num { text-align: right; font-variant-numeric: tabular-nums; }
  code { font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace; font-size: 13px; }
</style>"#;

// Minimal SVG line chart shared by both pages.
// lineChart(el, { xLabel, yLabel, series: [{ name, color, points: [[x, y, label?]], dashed?, marker? }],
//                 right?: { label, series } })
const CHART_JS: &str = r##"
const PALETTE = ["#a6cee3", "#1f78b4", "#b2df8a", "#33a02c", "#fb9a99", "#e31a1c", "#fdbf6f", "#ff7f00", "#cab2d6", "#6a3d9a"];
const MARKERS = ["circle", "square", "diamond", "triangle"];

function escapeHtml(s) {
  return String(s)
    .replaceAll("&", "&amp;")
    .replaceAll("<", "&lt;")
    .replaceAll(">", "&gt;")
    .replaceAll('"', "&quot;")
    .replaceAll("'", "&#39;");
}

function extent(values) {
  let lo = Math.min(...values), hi = Math.max(...values);
  if (!isFinite(lo) || !isFinite(hi)) return [0, 1];
  if (lo === hi) { lo -= 1; hi += 1; }
  if (lo > 0 && lo < hi * 0.5) lo = 0;
  return [lo, hi];
}

function ticks(lo, hi, n) {
  const step = (hi - lo) / n;
  return Array.from({ length: n + 1 }, (_, i) => lo + i * step);
}

function fmt(v) {
  return Math.abs(v) >= 100 ? v.toFixed(0) : v.toFixed(1);
}

function lineChart(el, opts) {
  const W = 520, H = 300, L = 60, R = opts.right ? 60 : 16, T = 16, B = 48;
  const all = opts.series.concat(opts.right ? opts.right.series : []);
  const [x0, x1] = extent(all.flatMap(s => s.points.map(p => p[0])));
  const [y0, y1] = extent(opts.series.flatMap(s => s.points.map(p => p[1])));
  const [r0, r1] = opts.right ? extent(opts.right.series.flatMap(s => s.points.map(p => p[1]))) : [0, 1];

  const sx = x => L + (x - x0) / (x1 - x0) * (W - L - R);
  const sy = y => H - B - (y - y0) / (y1 - y0) * (H - T - B);
  const sr = y => H - B - (y - r0) / (r1 - r0) * (H - T - B);

  let svg = `<svg class="chart" width="${W}" height="${H + 20 * all.length}" xmlns="http://www.w3.org/2000/svg">`;
  for (const t of ticks(y0, y1, 5)) {
    svg += `<line class="grid" x1="${L}" x2="${W - R}" y1="${sy(t)}" y2="${sy(t)}"/>`;
    svg += `<text x="${L - 6}" y="${sy(t) + 4}" text-anchor="end">${fmt(t)}</text>`;
  }
  for (const t of ticks(x0, x1, 5)) {
    svg += `<text x="${sx(t)}" y="${H - B + 16}" text-anchor="middle">${fmt(t)}</text>`;
  }
  if (opts.right) {
    for (const t of ticks(r0, r1, 5)) {
      svg += `<text x="${W - R + 6}" y="${sr(t) + 4}">${fmt(t)}</text>`;
    }
    svg += `<text transform="translate(${W - 8},${(H - B + T) / 2}) rotate(90)" text-anchor="middle">${escapeHtml(opts.right.label)}</text>`;
  }
  svg += `<line class="axis" x1="${L}" x2="${W - R}" y1="${H - B}" y2="${H - B}"/>`;
  svg += `<line class="axis" x1="${L}" x2="${L}" y1="${T}" y2="${H - B}"/>`;
  svg += `<text x="${(L + W - R) / 2}" y="${H - 12}" text-anchor="middle">${escapeHtml(opts.xLabel)}</text>`;
  svg += `<text transform="translate(14,${(H - B + T) / 2}) rotate(-90)" text-anchor="middle">${escapeHtml(opts.yLabel)}</text>`;

  const draw = (s, i, scaleY) => {
    const pts = s.points.map(p => `${sx(p[0])},${scaleY(p[1])}`).join(" ");
    const dash = s.dashed ? ` stroke-dasharray="6 4"` : "";
    svg += `<polyline fill="none" stroke="${s.color}" stroke-width="1.5"${dash} points="${pts}"/>`;
    for (const p of s.points) {
      const cx = sx(p[0]), cy = scaleY(p[1]);
      if (s.marker) svg += marker(MARKERS[i % MARKERS.length], cx, cy, s.color);
      if (p.length > 2) svg += `<text x="${cx - 4}" y="${cy - 6}" text-anchor="end" style="font-size:9px">${escapeHtml(p[2])}</text>`;
    }
  };
  opts.series.forEach((s, i) => draw(s, i, sy));
  if (opts.right) opts.right.series.forEach((s, i) => draw(s, i, sr));

  all.forEach((s, i) => {
    const y = H + 14 * i + 4;
    svg += `<line x1="${L}" x2="${L + 20}" y1="${y}" y2="${y}" stroke="${s.color}" stroke-width="2"${s.dashed ? ' stroke-dasharray="6 4"' : ""}/>`;
    svg += `<text x="${L + 26}" y="${y + 4}">${escapeHtml(s.name)}</text>`;
  });

  svg += `</svg>`;
  el.innerHTML = svg;
}

function marker(kind, x, y, color) {
  switch (kind) {
    case "square": return `<rect x="${x - 3}" y="${y - 3}" width="6" height="6" fill="${color}"/>`;
    case "diamond": return `<polygon points="${x},${y - 4} ${x + 4},${y} ${x},${y + 4} ${x - 4},${y}" fill="${color}"/>`;
    case "triangle": return `<polygon points="${x},${y - 4} ${x + 4},${y + 3} ${x - 4},${y + 3}" fill="${color}"/>`;
    default: return `<circle cx="${x}" cy="${y}" r="3" fill="${color}"/>`;
  }
}
"##;
