use super::TemplateSpec;

pub(crate) fn spec() -> TemplateSpec {
    TemplateSpec {
        html: HTML,
        features: &[
            "Text-to-speech playback",
            "Play, pause and stop controls",
            "Adjustable reading speed",
            "Keyboard shortcuts (Ctrl+Enter, Ctrl+Space, Escape)",
        ],
        usage: &[
            "Open index.html in a modern web browser",
            "Paste or type text into the text area",
            "Use Play, Pause and Stop or the keyboard shortcuts",
            "Adjust the reading speed with the slider",
        ],
    }
}

const HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{name}} - Screen Reader Tool</title>
    <style>{{base_css}}
        .speed { margin: 16px 0; }
        .speed label { display: block; font-weight: bold; margin-bottom: 4px; }
        textarea { min-height: 200px; }
    </style>
</head>
<body>
    <main class="container" aria-labelledby="app-title">
        <h1 id="app-title">{{name}}</h1>
        <p class="lead">{{prompt}}</p>

        <label for="text-input">Text to read aloud</label>
        <textarea id="text-input" aria-describedby="shortcuts"
                  placeholder="Paste or type the text you want read aloud"></textarea>
        <p id="shortcuts" class="lead">Ctrl+Enter to play, Ctrl+Space to pause or resume, Escape to stop.</p>

        <div class="row" role="group" aria-label="Playback controls">
            <button id="play-btn" type="button" aria-label="Play: read the text aloud">Play</button>
            <button id="pause-btn" type="button" class="secondary" aria-label="Pause or resume reading" disabled>Pause</button>
            <button id="stop-btn" type="button" class="danger" aria-label="Stop reading" disabled>Stop</button>
        </div>

        <div class="speed">
            <label for="rate">Reading speed: <span id="rate-value">1.0</span>x</label>
            <input id="rate" type="range" min="0.5" max="2" step="0.1" value="1" aria-valuemin="0.5" aria-valuemax="2">
        </div>

        <div id="status" class="status" role="status" aria-live="polite">Ready</div>
    </main>
    <script>
        const synth = window.speechSynthesis;
        const text = document.getElementById('text-input');
        const play = document.getElementById('play-btn');
        const pause = document.getElementById('pause-btn');
        const stop = document.getElementById('stop-btn');
        const rate = document.getElementById('rate');
        const rateValue = document.getElementById('rate-value');
        const status = document.getElementById('status');
        let paused = false;

        function setStatus(message) {
            status.textContent = message;
        }

        function setPlaying(playing) {
            play.disabled = playing;
            pause.disabled = !playing;
            stop.disabled = !playing;
        }

        function speak() {
            if (!synth) {
                setStatus('Speech synthesis is not supported in this browser.');
                return;
            }
            const content = text.value.trim();
            if (!content) {
                setStatus('Please enter some text to read.');
                text.focus();
                return;
            }
            synth.cancel();
            const utterance = new SpeechSynthesisUtterance(content);
            utterance.rate = parseFloat(rate.value);
            utterance.onstart = () => { setPlaying(true); setStatus('Reading...'); };
            utterance.onend = () => { setPlaying(false); paused = false; pause.textContent = 'Pause'; setStatus('Finished reading'); };
            utterance.onerror = (e) => { setPlaying(false); setStatus('Error: ' + e.error); };
            synth.speak(utterance);
        }

        function togglePause() {
            if (!synth) return;
            if (paused) {
                synth.resume();
                pause.textContent = 'Pause';
                setStatus('Resumed');
            } else {
                synth.pause();
                pause.textContent = 'Resume';
                setStatus('Paused');
            }
            paused = !paused;
        }

        function stopReading() {
            if (!synth) return;
            synth.cancel();
            paused = false;
            pause.textContent = 'Pause';
            setPlaying(false);
            setStatus('Stopped');
        }

        play.addEventListener('click', speak);
        pause.addEventListener('click', togglePause);
        stop.addEventListener('click', stopReading);
        rate.addEventListener('input', () => { rateValue.textContent = parseFloat(rate.value).toFixed(1); });

        document.addEventListener('keydown', (e) => {
            if (e.ctrlKey && e.key === 'Enter') { e.preventDefault(); speak(); }
            else if (e.ctrlKey && e.key === ' ') { e.preventDefault(); togglePause(); }
            else if (e.key === 'Escape') { stopReading(); }
        });

        if (!synth) {
            play.disabled = true;
            setStatus('Speech synthesis is not supported in this browser.');
        }
    </script>
</body>
</html>
"#;
