use super::TemplateSpec;

pub(crate) fn spec() -> TemplateSpec {
    TemplateSpec {
        html: HTML,
        features: &[
            "Text input with live processing",
            "Read results aloud when speech is available",
            "Adjustable text size",
        ],
        usage: &[
            "Open index.html in a modern web browser",
            "Type your input and press Process",
            "Use Read Aloud to hear the result, Clear to start again",
        ],
    }
}

const HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{name}}</title>
    <style>{{base_css}}
        textarea { min-height: 140px; }
        #output { min-height: 60px; white-space: pre-wrap; }
    </style>
</head>
<body>
    <main class="container" aria-labelledby="app-title">
        <h1 id="app-title">{{name}}</h1>
        <p class="lead">{{prompt}}</p>

        <label for="user-input">Your input</label>
        <textarea id="user-input" placeholder="Type here"></textarea>

        <div class="row" role="group" aria-label="Actions">
            <button id="process-btn" type="button">Process</button>
            <button id="speak-btn" type="button" class="secondary">Read Aloud</button>
            <button id="clear-btn" type="button" class="danger">Clear</button>
            <button id="bigger-btn" type="button" class="secondary" aria-label="Increase text size">A+</button>
            <button id="smaller-btn" type="button" class="secondary" aria-label="Decrease text size">A-</button>
        </div>

        <h2>Result</h2>
        <div id="output" class="status" role="status" aria-live="polite">Nothing processed yet.</div>
    </main>
    <script>
        const input = document.getElementById('user-input');
        const output = document.getElementById('output');
        let fontSize = 16;

        function processInput() {
            const text = input.value.trim();
            if (!text) {
                output.textContent = 'Please type something first.';
                input.focus();
                return;
            }
            const words = text.split(/\s+/).length;
            const sentences = text.split(/[.!?]+/).filter(s => s.trim()).length;
            output.textContent = text + '\n\n' + words + ' words, ' + sentences + ' sentences.';
        }

        function clearInput() {
            input.value = '';
            output.textContent = 'Cleared.';
            input.focus();
        }

        function readAloud() {
            if (!('speechSynthesis' in window)) {
                output.textContent = 'Speech is not supported in this browser.';
                return;
            }
            window.speechSynthesis.cancel();
            window.speechSynthesis.speak(new SpeechSynthesisUtterance(output.textContent));
        }

        function resize(delta) {
            fontSize = Math.min(32, Math.max(12, fontSize + delta));
            document.body.style.fontSize = fontSize + 'px';
        }

        document.getElementById('process-btn').addEventListener('click', processInput);
        document.getElementById('clear-btn').addEventListener('click', clearInput);
        document.getElementById('speak-btn').addEventListener('click', readAloud);
        document.getElementById('bigger-btn').addEventListener('click', () => resize(2));
        document.getElementById('smaller-btn').addEventListener('click', () => resize(-2));
        input.addEventListener('keydown', (e) => {
            if (e.ctrlKey && e.key === 'Enter') processInput();
        });
    </script>
</body>
</html>
"#;
