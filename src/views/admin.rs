use axum::response::Html;
use uuid::Uuid;

use super::{escape, format_datetime, layout, render_notice, Notice};
use crate::{auth::repo_types::User, flashcards::repo_types::FlashcardWithOwner};

const TITLE: &str = "Dictionary admin";

fn admin_layout(admin: &User, title: &str, notice: Option<&Notice>, content: &str) -> Html<String> {
    let body = format!(
        r#"<header class="admin">
<strong>{TITLE}</strong>
<nav>
<a href="/admin">Home</a>
<a href="/admin/users">Users</a>
<a href="/admin/flashcards">Flashcards</a>
<span>{username}</span>
<a href="/admin/logout">Log out</a>
</nav>
</header>
<main class="admin">
<h1>{title}</h1>
{notice}
{content}
</main>"#,
        username = escape(&admin.username),
        title = escape(title),
        notice = render_notice(notice),
    );
    layout(&format!("{title} · {TITLE}"), &body)
}

fn yes_no(v: bool) -> &'static str {
    if v {
        "yes"
    } else {
        "no"
    }
}

fn checked(v: bool) -> &'static str {
    if v {
        " checked"
    } else {
        ""
    }
}

pub fn login(error: Option<&str>) -> Html<String> {
    let body = format!(
        r#"<main class="admin-login">
<h1>{TITLE}</h1>
{notice}
<form method="post" action="/admin/login">
<label>Username <input name="username" required></label>
<label>Password <input name="password" type="password" required></label>
<button type="submit">Log in</button>
</form>
</main>"#,
        notice = render_notice(error.map(|e| Notice::Error(e.into())).as_ref()),
    );
    layout(TITLE, &body)
}

pub fn index(admin: &User, users: i64, flashcards: i64) -> Html<String> {
    let content = format!(
        r#"<ul class="counts">
<li><a href="/admin/users">Users</a>: {users}</li>
<li><a href="/admin/flashcards">Flashcards</a>: {flashcards}</li>
</ul>"#
    );
    admin_layout(admin, "Overview", None, &content)
}

pub fn users(admin: &User, users: &[User], notice: Option<&Notice>) -> Html<String> {
    let rows = users
        .iter()
        .map(|u| {
            format!(
                r#"<tr><td><a href="/admin/users/{id}">{id}</a></td><td>{name}</td><td>{su}</td><td><a href="/admin/users/{id}/edit">Edit</a></td></tr>"#,
                id = u.id,
                name = escape(&u.username),
                su = yes_no(u.is_superuser),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let content = format!(
        r#"<p><a class="button" href="/admin/users/new">New user</a></p>
<table>
<thead><tr><th>ID</th><th>Username</th><th>Superuser</th><th></th></tr></thead>
<tbody>
{rows}
</tbody>
</table>"#
    );
    admin_layout(admin, "Users", notice, &content)
}

pub fn user_detail(admin: &User, user: &User) -> Html<String> {
    let content = format!(
        r#"<dl>
<dt>ID</dt><dd>{id}</dd>
<dt>Username</dt><dd>{name}</dd>
<dt>Superuser</dt><dd>{su}</dd>
<dt>Created</dt><dd>{created}</dd>
</dl>
<p><a href="/admin/users/{id}/edit">Edit</a></p>
<form method="post" action="/admin/users/{id}/delete" onsubmit="return confirm('Delete this user and all their flashcards?')">
<button type="submit">Delete</button>
</form>"#,
        id = user.id,
        name = escape(&user.username),
        su = yes_no(user.is_superuser),
        created = format_datetime(Some(user.created_at)),
    );
    admin_layout(admin, "User", None, &content)
}

/// Values echoed back into the user form.
#[derive(Debug, Default)]
pub struct UserFormValues {
    pub id: Option<Uuid>,
    pub username: String,
    pub is_superuser: bool,
}

pub fn user_form(admin: &User, values: &UserFormValues, error: Option<&str>) -> Html<String> {
    let (title, action, password_hint) = match values.id {
        Some(id) => (
            "Edit user",
            format!("/admin/users/{id}/update"),
            "leave blank to keep the current password",
        ),
        None => ("New user", "/admin/users".to_string(), "required"),
    };
    let content = format!(
        r#"<form method="post" action="{action}">
<label>Username <input name="username" value="{name}" maxlength="20" required></label>
<label>Password ({password_hint}) <input name="password" type="password"></label>
<label><input type="checkbox" name="is_superuser"{su}> Superuser</label>
<button type="submit">Save</button>
</form>"#,
        name = escape(&values.username),
        su = checked(values.is_superuser),
    );
    let notice = error.map(|e| Notice::Error(e.into()));
    admin_layout(admin, title, notice.as_ref(), &content)
}

pub fn flashcards(
    admin: &User,
    cards: &[FlashcardWithOwner],
    query: Option<&str>,
    notice: Option<&Notice>,
) -> Html<String> {
    let rows = cards
        .iter()
        .map(|c| {
            format!(
                r#"<tr><td><a href="/admin/flashcards/{id}">{id}</a></td><td>{foreign}</td><td>{native}</td><td>{learned}</td><td>{owner}</td><td><a href="/admin/flashcards/{id}/edit">Edit</a></td></tr>"#,
                id = c.card.id,
                foreign = escape(&c.card.foreign_word),
                native = escape(&c.card.native_word),
                learned = yes_no(c.card.is_learned),
                owner = escape(&c.owner_username),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let content = format!(
        r#"<form method="get" action="/admin/flashcards" class="search">
<input name="q" value="{q}" placeholder="Search foreign or native word">
<button type="submit">Search</button>
</form>
<p><a class="button" href="/admin/flashcards/new">New flashcard</a></p>
<table>
<thead><tr><th>ID</th><th>Foreign word</th><th>Native word</th><th>Learned</th><th>Owner</th><th></th></tr></thead>
<tbody>
{rows}
</tbody>
</table>"#,
        q = escape(query.unwrap_or_default()),
    );
    admin_layout(admin, "Flashcards", notice, &content)
}

pub fn flashcard_detail(admin: &User, c: &FlashcardWithOwner) -> Html<String> {
    let content = format!(
        r#"<dl>
<dt>ID</dt><dd>{id}</dd>
<dt>Foreign word</dt><dd>{foreign}</dd>
<dt>Native word</dt><dd>{native}</dd>
<dt>Example</dt><dd>{example}</dd>
<dt>Learned</dt><dd>{learned}</dd>
<dt>Repetitions</dt><dd>{reps}</dd>
<dt>Last reviewed</dt><dd>{reviewed}</dd>
<dt>Created</dt><dd>{created}</dd>
<dt>Owner</dt><dd><a href="/admin/users/{owner_id}">{owner}</a></dd>
</dl>
<p><a href="/admin/flashcards/{id}/edit">Edit</a></p>
<form method="post" action="/admin/flashcards/{id}/delete" onsubmit="return confirm('Delete this flashcard?')">
<button type="submit">Delete</button>
</form>"#,
        id = c.card.id,
        foreign = escape(&c.card.foreign_word),
        native = escape(&c.card.native_word),
        example = escape(c.card.example.as_deref().unwrap_or("—")),
        learned = yes_no(c.card.is_learned),
        reps = c.card.repetitions,
        reviewed = format_datetime(c.card.last_reviewed),
        created = format_datetime(Some(c.card.created_at)),
        owner_id = c.card.owner_id,
        owner = escape(&c.owner_username),
    );
    admin_layout(admin, "Flashcard", None, &content)
}

/// Values echoed back into the flashcard form.
#[derive(Debug, Default)]
pub struct CardFormValues {
    pub id: Option<Uuid>,
    pub owner_id: Option<Uuid>,
    pub foreign_word: String,
    pub native_word: String,
    pub example: String,
    pub is_learned: bool,
    pub repetitions: String,
}

pub fn flashcard_form(
    admin: &User,
    values: &CardFormValues,
    owners: &[User],
    error: Option<&str>,
) -> Html<String> {
    let (title, action) = match values.id {
        Some(id) => ("Edit flashcard", format!("/admin/flashcards/{id}/update")),
        None => ("New flashcard", "/admin/flashcards".to_string()),
    };
    let options = owners
        .iter()
        .map(|u| {
            let selected = if values.owner_id == Some(u.id) { " selected" } else { "" };
            format!(
                r#"<option value="{id}"{selected}>{name}</option>"#,
                id = u.id,
                name = escape(&u.username),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let content = format!(
        r#"<form method="post" action="{action}">
<label>Owner <select name="owner_id" required>
{options}
</select></label>
<label>Foreign word <input name="foreign_word" value="{foreign}" maxlength="100" required></label>
<label>Native word <input name="native_word" value="{native}" maxlength="100" required></label>
<label>Example <textarea name="example" maxlength="500">{example}</textarea></label>
<label><input type="checkbox" name="is_learned"{learned}> Learned</label>
<label>Repetitions <input name="repetitions" type="number" min="0" value="{reps}"></label>
<button type="submit">Save</button>
</form>"#,
        foreign = escape(&values.foreign_word),
        native = escape(&values.native_word),
        example = escape(&values.example),
        learned = checked(values.is_learned),
        reps = escape(&values.repetitions),
    );
    let notice = error.map(|e| Notice::Error(e.into()));
    admin_layout(admin, title, notice.as_ref(), &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::repo_types::Flashcard;
    use time::OffsetDateTime;

    fn user(name: &str, is_superuser: bool) -> User {
        User {
            id: Uuid::new_v4(),
            username: name.into(),
            password_hash: "$argon2id$hidden".into(),
            is_superuser,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn users_table_never_shows_hashes() {
        let admin = user("admin", true);
        let Html(page) = users(&admin, &[admin.clone(), user("<eve>", false)], None);
        assert!(page.contains("&lt;eve&gt;"));
        assert!(!page.contains("$argon2id"));
        assert!(page.contains("/admin/users/new"));
    }

    #[test]
    fn flashcard_form_selects_owner() {
        let admin = user("admin", true);
        let owner = user("owner_1", false);
        let values = CardFormValues {
            owner_id: Some(owner.id),
            foreign_word: "Brot".into(),
            repetitions: "0".into(),
            ..CardFormValues::default()
        };
        let Html(page) = flashcard_form(&admin, &values, &[admin.clone(), owner.clone()], None);
        assert!(page.contains(&format!(r#"<option value="{}" selected>owner_1</option>"#, owner.id)));
        assert!(page.contains(r#"action="/admin/flashcards""#));
    }

    #[test]
    fn flashcard_list_echoes_query() {
        let admin = user("admin", true);
        let card = FlashcardWithOwner {
            card: Flashcard {
                id: Uuid::new_v4(),
                owner_id: admin.id,
                foreign_word: "Milch".into(),
                native_word: "milk".into(),
                example: None,
                is_learned: true,
                repetitions: 1,
                last_reviewed: None,
                created_at: OffsetDateTime::now_utc(),
            },
            owner_username: "admin".into(),
        };
        let Html(page) = flashcards(&admin, &[card], Some("mil\"k"), None);
        assert!(page.contains(r#"value="mil&quot;k""#));
        assert!(page.contains("Milch"));
    }

    #[test]
    fn edit_user_form_targets_update() {
        let admin = user("admin", true);
        let id = Uuid::new_v4();
        let Html(page) = user_form(
            &admin,
            &UserFormValues {
                id: Some(id),
                username: "bob".into(),
                is_superuser: true,
            },
            Some("Username already taken"),
        );
        assert!(page.contains(&format!("/admin/users/{id}/update")));
        assert!(page.contains(r#"name="is_superuser" checked"#));
        assert!(page.contains("Username already taken"));
    }
}
