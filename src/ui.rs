use crate::models::DailyPrediction;
use chrono::NaiveDate;

pub struct IndexView<'a> {
    pub location: &'a str,
    pub target_date: NaiveDate,
    pub record_count: usize,
    pub footfall_multiplier: f64,
    pub engine_connected: bool,
    pub prediction: &'a DailyPrediction,
}

pub fn render_index(view: &IndexView<'_>) -> String {
    let (engine_label, engine_state) = if view.engine_connected {
        ("Engine connected", "ok")
    } else {
        ("Placeholder mode", "warn")
    };
    INDEX_HTML
        .replace("{{LOCATION}}", &escape_html(view.location))
        .replace("{{DATE}}", &view.target_date.to_string())
        .replace("{{DAY}}", &view.target_date.format("%A").to_string())
        .replace("{{RECORDS}}", &view.record_count.to_string())
        .replace("{{MULTIPLIER}}", &format!("{:.2}", view.footfall_multiplier))
        .replace("{{ENGINE}}", engine_label)
        .replace("{{ENGINE_STATE}}", engine_state)
        .replace("{{COVERS}}", &view.prediction.total_covers.to_string())
        .replace("{{SALES}}", &format!("{:.0}", view.prediction.total_sales))
        .replace("{{LABOR_COST}}", &format!("{:.0}", view.prediction.labor_cost))
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Shift Planner</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef1f6;
      --bg-2: #cdd6f4;
      --ink: #1f2430;
      --accent: #4f46e5;
      --accent-2: #0f766e;
      --warn: #b45309;
      --danger: #be123c;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(31, 36, 48, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e4e9f5 60%, #f5f7fb 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1080px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    .card {
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 28px;
      display: grid;
      gap: 18px;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      justify-content: space-between;
      gap: 12px;
      align-items: end;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
    }

    h2 {
      margin: 0;
      font-size: 1.3rem;
    }

    .subtitle {
      margin: 0;
      color: #5f6472;
    }

    .badge {
      border-radius: 999px;
      padding: 6px 12px;
      font-size: 0.75rem;
      font-weight: 600;
      text-transform: uppercase;
      letter-spacing: 0.1em;
    }

    .badge[data-state="ok"], .badge[data-status="Optimal"] {
      background: rgba(15, 118, 110, 0.12);
      color: var(--accent-2);
    }

    .badge[data-state="warn"], .badge[data-status="Surplus"] {
      background: rgba(180, 83, 9, 0.12);
      color: var(--warn);
    }

    .badge[data-status="Understaffed"] {
      background: rgba(190, 18, 60, 0.12);
      color: var(--danger);
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(170px, 1fr));
      gap: 14px;
    }

    .stat {
      background: white;
      border-radius: 16px;
      padding: 16px;
      border: 1px solid rgba(31, 36, 48, 0.08);
      display: grid;
      gap: 6px;
    }

    .stat .label {
      font-size: 0.78rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #80859a;
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 600;
      color: var(--accent);
    }

    .shifts {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(300px, 1fr));
      gap: 18px;
    }

    .shift-head {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: #80859a;
      display: grid;
      gap: 6px;
    }

    input, select {
      font: inherit;
      border: 1px solid rgba(31, 36, 48, 0.15);
      border-radius: 12px;
      padding: 10px 12px;
      background: white;
    }

    form.grid, .controls {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
      gap: 12px;
      align-items: end;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
      box-shadow: 0 10px 24px rgba(79, 70, 229, 0.25);
    }

    button:disabled {
      opacity: 0.5;
      cursor: progress;
    }

    .sections {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(210px, 1fr));
      gap: 14px;
    }

    .sections p {
      white-space: pre-wrap;
      margin: 0;
      font-size: 0.92rem;
      color: #3d4254;
    }

    .sources a {
      color: var(--accent);
      margin-right: 12px;
      font-size: 0.85rem;
    }

    table {
      width: 100%;
      border-collapse: collapse;
      font-size: 0.92rem;
    }

    th, td {
      text-align: left;
      padding: 8px 10px;
      border-bottom: 1px solid rgba(31, 36, 48, 0.08);
    }

    th {
      font-size: 0.75rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: #80859a;
    }

    tr.match td:first-child {
      color: var(--accent);
      font-weight: 600;
    }

    .status {
      font-size: 0.95rem;
      min-height: 1.2em;
      color: #5f6472;
    }

    .status[data-type="error"] {
      color: var(--danger);
    }

    .status[data-type="ok"] {
      color: var(--accent-2);
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <div>
        <h1>Shift Planner</h1>
        <p class="subtitle">Front-of-house staffing for <b id="location-label">{{LOCATION}}</b>, {{RECORDS}} services logged.</p>
      </div>
      <span class="badge" data-state="{{ENGINE_STATE}}">{{ENGINE}}</span>
    </header>

    <section class="card">
      <div class="controls">
        <label>Service date <input id="target-date" type="date" value="{{DATE}}" /></label>
        <label>Lunch bookings <input id="lunch-bookings" type="number" min="0" value="12" /></label>
        <label>Dinner bookings <input id="dinner-bookings" type="number" min="0" value="55" /></label>
        <label>Hourly wage <input id="hourly-wage" type="number" min="0" step="0.5" value="15" /></label>
      </div>
      <div class="panel">
        <div class="stat"><span class="label">Target</span><span class="value" id="target-day">{{DAY}}</span></div>
        <div class="stat"><span class="label">Covers</span><span class="value" id="total-covers">{{COVERS}}</span></div>
        <div class="stat"><span class="label">Est. revenue</span><span class="value" id="total-sales">£{{SALES}}</span></div>
        <div class="stat"><span class="label">Labour cost</span><span class="value" id="labor-cost">£{{LABOR_COST}}</span></div>
        <div class="stat"><span class="label">Footfall index</span><span class="value" id="multiplier">{{MULTIPLIER}}</span></div>
        <div class="stat"><span class="label">Capacity load</span><span class="value" id="capacity-load">--</span></div>
      </div>
      <div class="shifts" id="shifts"></div>
    </section>

    <section class="card">
      <header>
        <div>
          <h2>Local conditions</h2>
          <p class="subtitle">Weather, transport and events read by the advice engine.</p>
        </div>
        <div class="controls">
          <label>Location <input id="location" type="text" value="{{LOCATION}}" /></label>
          <button id="advice-btn" type="button">Fetch tactical audit</button>
        </div>
      </header>
      <div class="status" id="advice-status"></div>
      <div class="sections" id="sections"></div>
      <div class="sources" id="sources"></div>
    </section>

    <section class="card">
      <h2>Efficiency</h2>
      <div class="panel" id="efficiency"></div>
      <table>
        <thead><tr><th>Date</th><th>Lunch sales</th><th>Lunch covers</th><th>Dinner sales</th><th>Dinner covers</th><th>Staff</th></tr></thead>
        <tbody id="series"></tbody>
      </table>
    </section>

    <section class="card">
      <h2>Log service actuals</h2>
      <form class="grid" id="record-form">
        <label>Date <input name="date" type="date" required /></label>
        <label>Shift
          <select name="shift">
            <option value="Lunch">Lunch</option>
            <option value="Dinner">Dinner</option>
          </select>
        </label>
        <label>Sales <input name="sales" type="number" min="0" step="0.01" /></label>
        <label>FOH staff <input name="staff_count" type="number" min="1" /></label>
        <label>Covers <input name="covers" type="number" min="0" /></label>
        <label>Reservations <input name="reservations" type="number" min="0" /></label>
        <button type="submit">Save</button>
      </form>
      <div class="status" id="record-status"></div>
      <table>
        <thead><tr><th>Date</th><th>Shift</th><th>Staff</th><th>Covers</th><th>Walk-ins</th><th>Sales</th></tr></thead>
        <tbody id="records"></tbody>
      </table>
    </section>
  </main>

  <script>
    const $ = (id) => document.getElementById(id);
    const money = (value) => '£' + Math.round(value).toLocaleString();

    const setStatus = (el, message, type) => {
      el.textContent = message;
      el.dataset.type = type || '';
    };

    const escapeText = (value) => {
      const div = document.createElement('div');
      div.textContent = value;
      return div.innerHTML;
    };

    const forecastParams = () => {
      const params = new URLSearchParams();
      const fields = {
        date: $('target-date').value,
        lunch_bookings: $('lunch-bookings').value,
        dinner_bookings: $('dinner-bookings').value,
        hourly_wage: $('hourly-wage').value
      };
      Object.entries(fields).forEach(([key, value]) => {
        if (value !== '') {
          params.set(key, value);
        }
      });
      return params;
    };

    const adviceBody = () => {
      const body = { location: $('location').value };
      if ($('target-date').value !== '') {
        body.target_date = $('target-date').value;
      }
      ['lunch_bookings', 'dinner_bookings'].forEach((key) => {
        const value = $(key.replace('_', '-')).value;
        if (value !== '') {
          body[key] = Number(value);
        }
      });
      return body;
    };

    const renderShift = (prediction, metrics) => `
      <div class="stat">
        <div class="shift-head">
          <h2>${prediction.shift} · peak ${prediction.peak_time}</h2>
          <span class="badge" data-status="${prediction.status}">${prediction.status}</span>
        </div>
        <div class="panel">
          <div><span class="label">Walk-ins</span><div class="value">${prediction.predicted_walkins}</div></div>
          <div><span class="label">Covers</span><div class="value">${prediction.predicted_covers}</div></div>
          <div><span class="label">Staff</span><div class="value">${prediction.suggested_staff}</div></div>
          <div><span class="label">SPLH</span><div class="value">${money(prediction.est_sales_per_labor_hour)}</div></div>
        </div>
        <p class="subtitle">ASPH ${money(metrics.asph)} from ${metrics.sample_size} services${metrics.day_matched ? ' on the same weekday' : ''}.</p>
      </div>`;

    const loadForecast = async () => {
      const res = await fetch('/api/forecast?' + forecastParams().toString());
      if (!res.ok) {
        throw new Error(await res.text() || 'Unable to load forecast');
      }
      const data = await res.json();
      const day = data.prediction;
      $('target-day').textContent = data.day_name;
      $('total-covers').textContent = day.total_covers;
      $('total-sales').textContent = money(day.total_sales);
      $('labor-cost').textContent = `${money(day.labor_cost)} (${day.labor_cost_ratio.toFixed(1)}%)`;
      $('multiplier').textContent = data.footfall_multiplier.toFixed(2);
      $('capacity-load').textContent = Math.round(day.capacity_load) + '%';
      $('shifts').innerHTML = renderShift(day.lunch, data.lunch_metrics) + renderShift(day.dinner, data.dinner_metrics);
    };

    const loadStats = async () => {
      const res = await fetch('/api/stats?date=' + encodeURIComponent($('target-date').value));
      if (!res.ok) {
        throw new Error('Unable to load stats');
      }
      const data = await res.json();
      $('efficiency').innerHTML = [['Lunch', data.lunch], ['Dinner', data.dinner]].map(([name, stats]) => `
        <div class="stat"><span class="label">${name} rev/staff</span><span class="value">${money(stats.revenue_per_staff)}</span></div>
        <div class="stat"><span class="label">${name} cov/staff</span><span class="value">${stats.covers_per_staff.toFixed(1)}</span></div>
        <div class="stat"><span class="label">${name} ASPH</span><span class="value">£${stats.asph.toFixed(1)}</span></div>`).join('');
      $('series').innerHTML = data.daily.map((point) => `
        <tr class="${point.matches_target_day ? 'match' : ''}">
          <td>${point.date} (${point.day_name})</td>
          <td>${money(point.lunch_sales)}</td><td>${point.lunch_covers}</td>
          <td>${money(point.dinner_sales)}</td><td>${point.dinner_covers}</td>
          <td>${point.staff}</td>
        </tr>`).join('');
    };

    const loadRecords = async () => {
      const res = await fetch('/api/records');
      if (!res.ok) {
        throw new Error('Unable to load records');
      }
      const records = await res.json();
      $('records').innerHTML = records.slice(0, 10).map((r) => `
        <tr><td>${r.date}</td><td>${r.shift}</td><td>${r.staff_count}</td><td>${r.covers}</td><td>${r.walkins}</td><td>${money(r.sales)}</td></tr>`).join('');
    };

    const refresh = async () => {
      await Promise.all([loadForecast(), loadStats(), loadRecords()]);
    };

    const renderAdvice = (data) => {
      const cards = [
        ['Environment', data.sections.environment],
        ['Logistics', data.sections.logistics],
        ['Opportunities', data.sections.opportunities],
        ['GM advice', data.sections.tactical]
      ];
      $('sections').innerHTML = cards.map(([title, body]) => `
        <div class="stat"><span class="label">${title}</span><p>${escapeText(body || 'No signal.')}</p></div>`).join('');
      $('sources').innerHTML = data.sources.map((s) =>
        `<a href="${encodeURI(s.uri)}" target="_blank" rel="noopener">${escapeText(s.title || s.uri)}</a>`).join('');
      $('location-label').textContent = data.location;
    };

    $('advice-btn').addEventListener('click', async () => {
      const button = $('advice-btn');
      button.disabled = true;
      setStatus($('advice-status'), 'Syncing...', 'info');
      try {
        const res = await fetch('/api/advice', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify(adviceBody())
        });
        if (!res.ok) {
          throw new Error(await res.text() || 'Request failed');
        }
        const data = await res.json();
        renderAdvice(data);
        if (data.warning) {
          setStatus($('advice-status'), data.warning, 'error');
        } else {
          setStatus($('advice-status'), `Footfall index ${data.footfall_index.toFixed(2)}`, 'ok');
        }
        await loadForecast();
      } catch (err) {
        setStatus($('advice-status'), err.message, 'error');
      } finally {
        button.disabled = false;
      }
    });

    $('record-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      const form = new FormData(event.target);
      const number = (name) => (form.get(name) === '' ? null : Number(form.get(name)));
      const payload = {
        date: form.get('date'),
        shift: form.get('shift'),
        sales: number('sales'),
        staff_count: number('staff_count'),
        covers: number('covers'),
        reservations: number('reservations')
      };
      try {
        const res = await fetch('/api/records', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify(payload)
        });
        if (!res.ok) {
          throw new Error(await res.text() || 'Request failed');
        }
        setStatus($('record-status'), 'Saved', 'ok');
        await refresh();
      } catch (err) {
        setStatus($('record-status'), err.message, 'error');
      }
    });

    ['target-date', 'lunch-bookings', 'dinner-bookings', 'hourly-wage'].forEach((id) => {
      $(id).addEventListener('change', () => {
        refresh().catch((err) => setStatus($('record-status'), err.message, 'error'));
      });
    });

    refresh().catch((err) => setStatus($('record-status'), err.message, 'error'));
  </script>
</body>
</html>
"#;
