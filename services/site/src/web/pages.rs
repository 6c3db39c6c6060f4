//! services/site/src/web/pages.rs
//!
//! Static shells for the two admin pages. Both talk to the JSON API from the
//! browser; the server only decides whether they may be shown at all.

use axum::response::Html;

const LOGIN_PAGE: &str = r#"<!doctype html>
<html lang="ko">
<head><meta charset="utf-8"><title>Admin Login</title></head>
<body>
  <h1>Admin Login</h1>
  <form id="login">
    <input type="password" name="password" autocomplete="current-password" required>
    <button type="submit">Sign in</button>
    <p id="error" role="alert"></p>
  </form>
  <script>
    document.getElementById("login").addEventListener("submit", async (e) => {
      e.preventDefault();
      const password = new FormData(e.target).get("password");
      const resp = await fetch("/api/admin/login", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify({ password }),
      });
      if (resp.ok) return location.replace("/admin/therapy-analytics");
      const j = await resp.json().catch(() => ({}));
      document.getElementById("error").textContent = j.error ?? "Login failed";
    });
  </script>
</body>
</html>
"#;

const ANALYTICS_PAGE: &str = r#"<!doctype html>
<html lang="ko">
<head><meta charset="utf-8"><title>Therapy Analytics</title></head>
<body>
  <h1>Therapy Analytics</h1>
  <textarea id="snapshot" rows="24" cols="80"></textarea>
  <p><button id="save">Save</button> <button id="logout">Log out</button></p>
  <p id="status" role="status"></p>
  <script>
    const box = document.getElementById("snapshot");
    const status = document.getElementById("status");
    fetch("/api/admin/therapy-analytics")
      .then((r) => r.json())
      .then((j) => { box.value = JSON.stringify(j.snapshot, null, 2); });
    document.getElementById("save").addEventListener("click", async () => {
      const resp = await fetch("/api/admin/therapy-analytics", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: box.value,
      });
      const j = await resp.json().catch(() => ({}));
      if (resp.ok) box.value = JSON.stringify(j.snapshot, null, 2);
      status.textContent = resp.ok ? "Saved" : (j.error ?? "Save failed");
    });
    document.getElementById("logout").addEventListener("click", async () => {
      await fetch("/api/admin/logout", { method: "POST" });
      location.replace("/admin/login");
    });
  </script>
</body>
</html>
"#;

pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

pub async fn analytics_page() -> Html<&'static str> {
    Html(ANALYTICS_PAGE)
}
