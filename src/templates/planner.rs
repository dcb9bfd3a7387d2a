use super::TemplateSpec;

pub(crate) fn spec() -> TemplateSpec {
    TemplateSpec {
        html: HTML,
        features: &[
            "Add, complete and delete tasks",
            "Tasks saved in the browser between visits",
            "Remaining task counter announced to screen readers",
        ],
        usage: &[
            "Open index.html in a modern web browser",
            "Type a task and press Enter or the Add Task button",
            "Use the checkbox to mark a task complete",
            "Use Delete to remove a task",
        ],
    }
}

const HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{name}} - Daily Planner</title>
    <style>{{base_css}}
        ul { list-style: none; margin-top: 16px; }
        li { display: flex; align-items: center; gap: 10px; padding: 10px; border-bottom: 1px solid #e5e7eb; }
        li label { flex: 1; }
        li.done label { text-decoration: line-through; color: #6b7280; }
        li input[type="checkbox"] { width: 22px; height: 22px; }
        li button { padding: 6px 12px; font-size: 14px; }
    </style>
</head>
<body>
    <main class="container" aria-labelledby="app-title">
        <h1 id="app-title">{{name}}</h1>
        <p class="lead">{{prompt}}</p>

        <form id="task-form" class="row" aria-label="Add a new task">
            <label for="task-input" class="sr-only">New task</label>
            <input id="task-input" type="text" placeholder="What do you need to do?" autocomplete="off" required>
            <button type="submit">Add Task</button>
        </form>

        <section aria-labelledby="tasks-title">
            <h2 id="tasks-title">Your Tasks <span id="remaining" aria-live="polite"></span></h2>
            <ul id="task-list"></ul>
            <p id="empty" class="lead">No tasks yet. Add your first task above.</p>
        </section>

        <div id="announcer" class="sr-only" aria-live="assertive"></div>
    </main>
    <script>
        const STORAGE_KEY = '{{slug}}-tasks';
        const form = document.getElementById('task-form');
        const input = document.getElementById('task-input');
        const list = document.getElementById('task-list');
        const empty = document.getElementById('empty');
        const remaining = document.getElementById('remaining');
        const announcer = document.getElementById('announcer');
        let tasks = load();

        function load() {
            try {
                return JSON.parse(localStorage.getItem(STORAGE_KEY)) || [];
            } catch (e) {
                return [];
            }
        }

        function save() {
            try {
                localStorage.setItem(STORAGE_KEY, JSON.stringify(tasks));
            } catch (e) {
                announce('Tasks could not be saved in this browser.');
            }
        }

        function announce(message) {
            announcer.textContent = message;
        }

        function addTask(text) {
            tasks.push({ id: Date.now(), text: text, completed: false });
            save();
            render();
            announce('Task added: ' + text);
        }

        function toggleTask(id) {
            const task = tasks.find(t => t.id === id);
            if (!task) return;
            task.completed = !task.completed;
            save();
            render();
            announce(task.completed ? 'Task completed: ' + task.text : 'Task reopened: ' + task.text);
        }

        function deleteTask(id) {
            const task = tasks.find(t => t.id === id);
            tasks = tasks.filter(t => t.id !== id);
            save();
            render();
            if (task) announce('Task deleted: ' + task.text);
        }

        function render() {
            list.innerHTML = '';
            tasks.forEach(task => {
                const li = document.createElement('li');
                li.className = task.completed ? 'done' : '';
                const box = document.createElement('input');
                box.type = 'checkbox';
                box.id = 'task-' + task.id;
                box.checked = task.completed;
                box.addEventListener('change', () => toggleTask(task.id));
                const label = document.createElement('label');
                label.htmlFor = box.id;
                label.textContent = task.text;
                const del = document.createElement('button');
                del.type = 'button';
                del.className = 'danger';
                del.textContent = 'Delete';
                del.setAttribute('aria-label', 'Delete task: ' + task.text);
                del.addEventListener('click', () => deleteTask(task.id));
                li.append(box, label, del);
                list.appendChild(li);
            });
            const open = tasks.filter(t => !t.completed).length;
            remaining.textContent = tasks.length ? '(' + open + ' remaining)' : '';
            empty.hidden = tasks.length > 0;
        }

        form.addEventListener('submit', (e) => {
            e.preventDefault();
            const text = input.value.trim();
            if (!text) {
                announce('Please enter a task first.');
                input.focus();
                return;
            }
            addTask(text);
            input.value = '';
            input.focus();
        });

        render();
    </script>
</body>
</html>
"#;
