use axum::response::Html;

const INDEX_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Documentation Chatbot</title>
<style>
body { font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
input, textarea { width: 100%; margin: 0.25rem 0 0.75rem; }
pre { white-space: pre-wrap; background: #f4f4f4; padding: 0.75rem; }
</style>
</head>
<body>
<h1>Documentation Chatbot</h1>

<h2>Ask a question</h2>
<form id="ask">
  <textarea name="question" rows="3" placeholder="Ask a question about the documents"></textarea>
  <button type="submit">Get answer</button>
</form>
<pre id="answer"></pre>

<h2>Upload a document</h2>
<form id="upload">
  <input type="file" name="file" accept=".pdf,.html,.htm,.txt,.md">
  <button type="submit">Ingest</button>
</form>

<h2>Load a Confluence page</h2>
<form id="confluence">
  <input name="space_key" placeholder="Space key, e.g. DEVOPS">
  <input name="page_title" placeholder="Page title">
  <button type="submit">Load</button>
</form>
<pre id="status"></pre>

<script>
const show = (id, text) => { document.getElementById(id).textContent = text; };
const describe = async (res) => {
  const body = await res.json().catch(() => ({}));
  return body.error ?? body.message ?? body.answer ?? JSON.stringify(body);
};
document.getElementById("ask").addEventListener("submit", async (e) => {
  e.preventDefault();
  show("answer", "Thinking...");
  const question = new FormData(e.target).get("question");
  const res = await fetch("/api/v1/query", {
    method: "POST",
    headers: { "content-type": "application/json" },
    body: JSON.stringify({ question }),
  });
  show("answer", await describe(res));
});
document.getElementById("upload").addEventListener("submit", async (e) => {
  e.preventDefault();
  show("status", "Processing...");
  const res = await fetch("/api/v1/ingest", { method: "POST", body: new FormData(e.target) });
  show("status", await describe(res));
});
document.getElementById("confluence").addEventListener("submit", async (e) => {
  e.preventDefault();
  show("status", "Fetching page...");
  const form = new FormData(e.target);
  const res = await fetch("/api/v1/ingest/confluence", {
    method: "POST",
    headers: { "content-type": "application/json" },
    body: JSON.stringify({ space_key: form.get("space_key"), page_title: form.get("page_title") }),
  });
  show("status", await describe(res));
});
</script>
</body>
</html>
"#;

pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_PAGE)
}
