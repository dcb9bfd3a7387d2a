use super::TemplateSpec;

pub(crate) fn spec() -> TemplateSpec {
    TemplateSpec {
        html: HTML,
        features: &[
            "Medication schedule with dose and time",
            "Mark doses as taken for the day",
            "Browser notifications when a dose is due",
            "Schedule saved in the browser between visits",
        ],
        usage: &[
            "Open index.html in a modern web browser",
            "Enter the medication name, dose and time, then press Add Reminder",
            "Allow notifications to be alerted when a dose is due",
            "Press Mark Taken after taking a dose",
        ],
    }
}

const HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{name}} - Medication Reminder</title>
    <style>{{base_css}}
        form { display: grid; gap: 10px; }
        .med { display: flex; align-items: center; gap: 12px; padding: 12px; border: 1px solid #e5e7eb; border-radius: 6px; margin-top: 10px; }
        .med .info { flex: 1; }
        .med .time { font-size: 14px; color: #4b5563; }
        .med.taken { background: #ecfdf5; }
        .med.taken .name::after { content: " (taken)"; color: #047857; }
        .med.due { border-color: #b91c1c; }
    </style>
</head>
<body>
    <main class="container" aria-labelledby="app-title">
        <h1 id="app-title">{{name}}</h1>
        <p class="lead">{{prompt}}</p>

        <form id="med-form" aria-label="Add a medication reminder">
            <label for="med-name">Medication name</label>
            <input id="med-name" type="text" required autocomplete="off">
            <label for="med-dose">Dose</label>
            <input id="med-dose" type="text" placeholder="e.g. 1 tablet">
            <label for="med-time">Time</label>
            <input id="med-time" type="time" required>
            <button type="submit">Add Reminder</button>
        </form>

        <section aria-labelledby="schedule-title">
            <h2 id="schedule-title">Today's Schedule</h2>
            <div id="med-list" role="list"></div>
            <p id="empty" class="lead">No medications scheduled yet.</p>
        </section>

        <div class="row">
            <button id="notify-btn" type="button" class="secondary">Enable Notifications</button>
        </div>
        <div id="status" class="status" role="status" aria-live="polite">Ready</div>
    </main>
    <script>
        const STORAGE_KEY = '{{slug}}-medications';
        const form = document.getElementById('med-form');
        const list = document.getElementById('med-list');
        const empty = document.getElementById('empty');
        const status = document.getElementById('status');
        const notifyBtn = document.getElementById('notify-btn');
        let meds = load();

        function today() {
            return new Date().toISOString().slice(0, 10);
        }

        function load() {
            try {
                return JSON.parse(localStorage.getItem(STORAGE_KEY)) || [];
            } catch (e) {
                return [];
            }
        }

        function save() {
            try {
                localStorage.setItem(STORAGE_KEY, JSON.stringify(meds));
            } catch (e) {
                setStatus('Schedule could not be saved in this browser.');
            }
        }

        function setStatus(message) {
            status.textContent = message;
        }

        function addMedication(name, dose, time) {
            meds.push({ id: Date.now(), name: name, dose: dose, time: time, takenOn: null, notifiedOn: null });
            meds.sort((a, b) => a.time.localeCompare(b.time));
            save();
            render();
            setStatus('Reminder added: ' + name + ' at ' + time);
        }

        function markTaken(id) {
            const med = meds.find(m => m.id === id);
            if (!med) return;
            med.takenOn = med.takenOn === today() ? null : today();
            save();
            render();
            setStatus(med.takenOn ? med.name + ' marked as taken' : med.name + ' marked as not taken');
        }

        function removeMedication(id) {
            meds = meds.filter(m => m.id !== id);
            save();
            render();
            setStatus('Reminder removed');
        }

        function render() {
            list.innerHTML = '';
            const now = new Date().toTimeString().slice(0, 5);
            meds.forEach(med => {
                const taken = med.takenOn === today();
                const row = document.createElement('div');
                row.setAttribute('role', 'listitem');
                row.className = 'med' + (taken ? ' taken' : '') + (!taken && med.time <= now ? ' due' : '');
                const info = document.createElement('div');
                info.className = 'info';
                const name = document.createElement('div');
                name.className = 'name';
                name.textContent = med.name + (med.dose ? ' - ' + med.dose : '');
                const time = document.createElement('div');
                time.className = 'time';
                time.textContent = 'Time: ' + med.time;
                info.append(name, time);
                const takeBtn = document.createElement('button');
                takeBtn.type = 'button';
                takeBtn.textContent = taken ? 'Undo' : 'Mark Taken';
                takeBtn.setAttribute('aria-pressed', taken ? 'true' : 'false');
                takeBtn.setAttribute('aria-label', (taken ? 'Mark not taken: ' : 'Mark taken: ') + med.name);
                takeBtn.addEventListener('click', () => markTaken(med.id));
                const del = document.createElement('button');
                del.type = 'button';
                del.className = 'danger';
                del.textContent = 'Remove';
                del.setAttribute('aria-label', 'Remove reminder: ' + med.name);
                del.addEventListener('click', () => removeMedication(med.id));
                row.append(info, takeBtn, del);
                list.appendChild(row);
            });
            empty.hidden = meds.length > 0;
        }

        function checkDue() {
            const now = new Date().toTimeString().slice(0, 5);
            meds.forEach(med => {
                if (med.time === now && med.takenOn !== today() && med.notifiedOn !== today()) {
                    med.notifiedOn = today();
                    save();
                    setStatus('Time to take ' + med.name);
                    if ('Notification' in window && Notification.permission === 'granted') {
                        new Notification('Medication reminder', { body: 'Time to take ' + med.name });
                    }
                }
            });
            render();
        }

        notifyBtn.addEventListener('click', () => {
            if (!('Notification' in window)) {
                setStatus('Notifications are not supported in this browser.');
                return;
            }
            Notification.requestPermission().then(p => {
                setStatus(p === 'granted' ? 'Notifications enabled' : 'Notifications were not allowed');
            });
        });

        form.addEventListener('submit', (e) => {
            e.preventDefault();
            const name = document.getElementById('med-name').value.trim();
            const dose = document.getElementById('med-dose').value.trim();
            const time = document.getElementById('med-time').value;
            if (!name || !time) {
                setStatus('Please enter a medication name and time.');
                return;
            }
            addMedication(name, dose, time);
            form.reset();
            document.getElementById('med-name').focus();
        });

        render();
        setInterval(checkDue, 30000);
    </script>
</body>
</html>
"#;
