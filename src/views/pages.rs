use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use uuid::Uuid;

use super::{escape, format_datetime, layout, render_notice, Notice};
use crate::{
    auth::repo_types::User,
    flashcards::{repo_types::Flashcard, services::DeckStats},
};

/// Messages for the landing page's two forms.
#[derive(Debug, Default)]
pub struct Landing {
    pub login_error: Option<String>,
    pub register_error: Option<String>,
    pub success: Option<String>,
}

pub fn landing(page: &Landing) -> Html<String> {
    let message = |class: &str, text: &Option<String>| {
        text.as_deref()
            .map(|t| format!(r#"<p class="{class}">{}</p>"#, escape(t)))
            .unwrap_or_default()
    };
    let body = format!(
        r#"<main class="landing">
<h1>Vocabulary flashcards</h1>
{success}
<section>
<h2>Log in</h2>
<form id="login-form" method="post" action="/web/login">
<label>Username <input id="username" name="username" required></label>
<label>Password <input id="password" name="password" type="password" required></label>
<button type="submit">Log in</button>
<p id="login-error" class="form-error">{login_error}</p>
</form>
</section>
<section>
<h2>Register</h2>
<form id="register-form" method="post" action="/web/register">
<label>Username <input id="reg-username" name="username" minlength="3" maxlength="20" pattern="[A-Za-z0-9_]+" required></label>
<label>Password <input id="reg-password" name="password" type="password" minlength="8" required></label>
<button type="submit">Register</button>
<p id="register-error" class="form-error">{register_error}</p>
<p id="register-success" class="form-success"></p>
</form>
</section>
</main>
<script src="/static/js/script.js"></script>"#,
        success = message("notice success", &page.success),
        login_error = page.login_error.as_deref().map(escape).unwrap_or_default(),
        register_error = page.register_error.as_deref().map(escape).unwrap_or_default(),
    );
    layout("Vocabulary flashcards", &body)
}

fn card_html(card: &Flashcard) -> String {
    let example = card
        .example
        .as_deref()
        .map(|e| format!(r#"<p class="example">{}</p>"#, escape(e)))
        .unwrap_or_default();
    let (state_class, toggle_label) = if card.is_learned {
        ("learned", "Mark as not learned")
    } else {
        ("in-progress", "Mark as learned")
    };
    format!(
        r#"<article class="flashcard {state_class}">
<div class="front">{foreign}</div>
<div class="back">{native}</div>
{example}
<p class="meta">Repetitions: {reps} · Last reviewed: {reviewed}</p>
<div class="actions">
<form method="post" action="/web/flashcards/{id}/mark-learned"><button type="submit">{toggle_label}</button></form>
<a href="/web/flashcards/{id}/edit">Edit</a>
<form method="post" action="/web/flashcards/{id}/delete" onsubmit="return confirm('Delete this card?')"><button type="submit">Delete</button></form>
</div>
</article>"#,
        id = card.id,
        foreign = escape(&card.foreign_word),
        native = escape(&card.native_word),
        reps = card.repetitions,
        reviewed = format_datetime(card.last_reviewed),
    )
}

pub fn dashboard(user: &User, cards: &[Flashcard], notice: Option<&Notice>) -> Html<String> {
    let stats = DeckStats::from_cards(cards);
    let list = if cards.is_empty() {
        r#"<p class="empty">No flashcards yet. Add your first word above.</p>"#.to_string()
    } else {
        cards.iter().map(card_html).collect::<Vec<_>>().join("\n")
    };
    let body = format!(
        r#"<header>
<h1>Hello, {username}!</h1>
<nav>{admin_link}<a href="/logout">Log out</a></nav>
</header>
{notice}
<section class="stats">
<span>Total: <strong>{total}</strong></span>
<span>Learned: <strong>{learned}</strong></span>
<span>In progress: <strong>{in_progress}</strong></span>
</section>
<section>
<h2>Add a flashcard</h2>
<form id="add-flashcard-form" method="post" action="/web/flashcards">
<label>Foreign word <input id="foreign_word" name="foreign_word" maxlength="100" required></label>
<label>Translation <input id="native_word" name="native_word" maxlength="100" required></label>
<label>Example <textarea id="example" name="example" maxlength="500"></textarea></label>
<button type="submit">Add</button>
</form>
</section>
<section class="cards">
{list}
</section>
<script src="/static/js/dashboard.js"></script>"#,
        username = escape(&user.username),
        admin_link = if user.is_superuser {
            r#"<a href="/admin">Admin</a> "#
        } else {
            ""
        },
        notice = render_notice(notice),
        total = stats.total,
        learned = stats.learned,
        in_progress = stats.in_progress,
    );
    layout("Dashboard", &body)
}

/// Values prefilled into the edit form.
#[derive(Debug, Clone)]
pub struct EditCard {
    pub id: Uuid,
    pub foreign_word: String,
    pub native_word: String,
    pub example: String,
}

impl From<&Flashcard> for EditCard {
    fn from(c: &Flashcard) -> Self {
        Self {
            id: c.id,
            foreign_word: c.foreign_word.clone(),
            native_word: c.native_word.clone(),
            example: c.example.clone().unwrap_or_default(),
        }
    }
}

pub fn edit_flashcard(user: &User, card: &EditCard, error: Option<&str>) -> Html<String> {
    let notice = error.map(|e| Notice::Error(e.to_string()));
    let body = format!(
        r#"<header>
<h1>Edit flashcard</h1>
<nav><span>{username}</span> <a href="/dashboard">Back to dashboard</a></nav>
</header>
{notice}
<form method="post" action="/web/flashcards/{id}/update">
<label>Foreign word <input name="foreign_word" value="{foreign}" maxlength="100" required></label>
<label>Translation <input name="native_word" value="{native}" maxlength="100" required></label>
<label>Example <textarea name="example" maxlength="500">{example}</textarea></label>
<button type="submit">Save</button>
</form>"#,
        username = escape(&user.username),
        notice = render_notice(notice.as_ref()),
        id = card.id,
        foreign = escape(&card.foreign_word),
        native = escape(&card.native_word),
        example = escape(&card.example),
    );
    layout("Edit flashcard", &body)
}

pub fn not_found() -> Response {
    let body = r#"<main class="not-found">
<h1>404</h1>
<p>The page you are looking for does not exist.</p>
<p><a href="/">Go home</a></p>
</main>"#;
    (StatusCode::NOT_FOUND, layout("Page not found", body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn user(is_superuser: bool) -> User {
        User {
            id: Uuid::new_v4(),
            username: "learner".into(),
            password_hash: "$argon2id$secret".into(),
            is_superuser,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn card(foreign: &str, is_learned: bool) -> Flashcard {
        Flashcard {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            foreign_word: foreign.into(),
            native_word: "translation".into(),
            example: Some("<i>example</i>".into()),
            is_learned,
            repetitions: 2,
            last_reviewed: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn landing_shows_errors() {
        let Html(page) = landing(&Landing {
            login_error: Some("Incorrect username or password".into()),
            ..Landing::default()
        });
        assert!(page.contains(r#"id="login-form""#));
        assert!(page.contains("Incorrect username or password"));
    }

    #[test]
    fn dashboard_lists_cards_with_stats() {
        let cards = vec![card("Katze", true), card("<Hund>", false)];
        let Html(page) = dashboard(&user(false), &cards, Some(&Notice::Success("ok".into())));
        assert!(page.contains("Hello, learner!"));
        assert!(page.contains("Total: <strong>2</strong>"));
        assert!(page.contains("Learned: <strong>1</strong>"));
        assert!(page.contains("Katze"));
        assert!(page.contains("&lt;Hund&gt;"));
        assert!(page.contains("&lt;i&gt;example&lt;/i&gt;"));
        assert!(!page.contains("$argon2id"));
        assert!(!page.contains(r#"href="/admin""#));
    }

    #[test]
    fn dashboard_links_admin_for_superusers() {
        let Html(page) = dashboard(&user(true), &[], None);
        assert!(page.contains(r#"href="/admin""#));
        assert!(page.contains("No flashcards yet"));
    }

    #[test]
    fn edit_form_is_prefilled() {
        let c = card("\"quoted\"", false);
        let Html(page) = edit_flashcard(&user(false), &EditCard::from(&c), Some("bad input"));
        assert!(page.contains(&format!("/web/flashcards/{}/update", c.id)));
        assert!(page.contains(r#"value="&quot;quoted&quot;""#));
        assert!(page.contains("bad input"));
    }

    #[test]
    fn not_found_is_404() {
        assert_eq!(not_found().status(), StatusCode::NOT_FOUND);
    }
}
