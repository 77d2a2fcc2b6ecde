//! Dashboard Page
//! The embedded single page: three dropdowns and two chart slots, rendered
//! with Chart.js from the JSON chart specifications.

pub const INDEX_HTML: &str = r#"<!doctype html>
<html>
  <head>
    <meta charset="utf-8" />
    <title>COVID-19 : U.S Cases and Deaths</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <style>
      :root {
        --bg: #0f172a;
        --panel: #1e293b;
        --text: #e2e8f0;
        --muted: #94a3b8;
        --accent: #2d12ed;
        --border: #334155;
      }
      body { font-family: "Inter", system-ui, sans-serif; margin: 0; background: var(--bg); color: var(--text); }
      header { padding: 18px 24px; border-bottom: 1px solid var(--border); }
      h1 { margin: 0; font-size: 24px; font-weight: 700; text-align: center; }
      main { max-width: 1100px; margin: 0 auto; padding: 20px; display: flex; flex-direction: column; gap: 20px; }

      .controls { display: grid; grid-template-columns: repeat(3, 1fr); gap: 16px; }
      .control { background: var(--panel); border: 1px solid var(--border); border-radius: 8px; padding: 12px 16px; }
      .control label { display: block; font-size: 12px; font-weight: 600; color: var(--muted); text-transform: uppercase; letter-spacing: 0.05em; margin-bottom: 8px; }
      .control select { width: 100%; padding: 8px; border-radius: 6px; border: 1px solid var(--border); background: var(--bg); color: var(--text); font-size: 14px; }

      .card { background: var(--panel); border: 1px solid var(--border); border-radius: 8px; padding: 16px; }
      .chart-container { position: relative; height: 340px; width: 100%; }
      #message { display: none; padding: 12px 16px; border: 1px solid var(--border); border-radius: 8px; color: var(--muted); }
    </style>
  </head>
  <body>
    <header>
      <h1>COVID-19 : U.S Cases and Deaths</h1>
    </header>

    <main>
      <div class="controls">
        <div class="control">
          <label for="state">State</label>
          <select id="state"></select>
        </div>
        <div class="control">
          <label for="month">Month</label>
          <select id="month"></select>
        </div>
        <div class="control">
          <label for="year">Year</label>
          <select id="year"></select>
        </div>
      </div>

      <div id="message"></div>

      <div class="card">
        <div class="chart-container"><canvas id="chart-cases"></canvas></div>
      </div>
      <div class="card">
        <div class="chart-container"><canvas id="chart-deaths"></canvas></div>
      </div>
    </main>

    <script>
      Chart.defaults.color = '#94a3b8';
      Chart.defaults.borderColor = '#334155';

      const charts = { cases: null, deaths: null };
      const DEFAULT_LINE_COLOR = '#636efa';

      function fillSelect(id, values, selected) {
        const select = document.getElementById(id);
        select.innerHTML = values
          .map(v => `<option value="${v}" ${String(v) === String(selected) ? 'selected' : ''}>${v}</option>`)
          .join('');
        select.onchange = refresh;
      }

      function showMessage(text) {
        const el = document.getElementById('message');
        el.innerText = text;
        el.style.display = text ? 'block' : 'none';
      }

      function renderChart(slot, spec) {
        const labels = [...new Set(spec.series.flatMap(s => s.points.map(p => p.date)))].sort();
        const datasets = spec.series.map(s => {
          const byDate = Object.fromEntries(s.points.map(p => [p.date, p.value]));
          return {
            label: s.name,
            data: labels.map(d => byDate[d] ?? null),
            borderColor: s.color || DEFAULT_LINE_COLOR,
            backgroundColor: s.color || DEFAULT_LINE_COLOR,
            borderWidth: 2,
            pointRadius: 2,
            spanGaps: true,
          };
        });

        if (charts[slot]) charts[slot].destroy();
        charts[slot] = new Chart(document.getElementById('chart-' + slot), {
          type: 'line',
          data: { labels, datasets },
          options: {
            responsive: true,
            maintainAspectRatio: false,
            animation: { duration: 0 },
            plugins: {
              title: { display: true, text: spec.title, color: '#e2e8f0', font: { size: 16 } },
              legend: { display: spec.series.length > 1 },
            },
            scales: {
              x: { title: { display: true, text: spec.x_label } },
              y: {
                title: { display: true, text: spec.y_label },
                min: spec.y_range.min,
                max: spec.y_range.max,
              },
            },
          },
        });
      }

      async function refresh() {
        const params = new URLSearchParams({
          state: document.getElementById('state').value,
          month: document.getElementById('month').value,
          year: document.getElementById('year').value,
        });

        const res = await fetch('/api/charts?' + params);
        if (!res.ok) {
          const body = await res.json().catch(() => ({ error: 'request failed' }));
          showMessage('No data for this selection: ' + (body.error || res.statusText));
          return;
        }

        const specs = await res.json();
        const empty = specs.cases.series.length === 0;
        showMessage(empty ? 'No data for this selection.' : '');
        renderChart('cases', specs.cases);
        renderChart('deaths', specs.deaths);
      }

      async function init() {
        const res = await fetch('/api/options');
        const options = await res.json();
        fillSelect('state', options.states, options.default.state);
        fillSelect('month', options.months, options.default.month);
        fillSelect('year', options.years, options.default.year);
        await refresh();
      }

      init();
    </script>
  </body>
</html>
"#;
