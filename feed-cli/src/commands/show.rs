//! Print cached records.

use anyhow::Result;
use feed_types::{Post, ResourceKind, User};

use crate::session::Session;

/// Run the show command.
pub async fn run(session: &Session, kind: ResourceKind, limit: u32) -> Result<()> {
    let lines = render(session, kind, limit).await?;

    if lines.is_empty() {
        println!("No cached {} records.", kind);
        return Ok(());
    }

    println!("=== {} ({} shown) ===", kind, lines.len());
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

/// Cached records of a kind as display lines, newest first.
async fn render(session: &Session, kind: ResourceKind, limit: u32) -> Result<Vec<String>> {
    let store = session.repository.store();
    let lines = match kind {
        ResourceKind::Feed | ResourceKind::MyPosts => store
            .read_paged::<Post>(kind, limit, 0)
            .await?
            .iter()
            .map(describe_post)
            .collect(),
        ResourceKind::Directory => store
            .read_paged::<User>(kind, limit, 0)
            .await?
            .iter()
            .map(describe_user)
            .collect(),
    };
    Ok(lines)
}

fn describe_post(post: &Post) -> String {
    format!("#{:<5} {} (by user {})", post.id, post.title, post.author_id)
}

fn describe_user(user: &User) -> String {
    match &user.avatar_url {
        Some(url) => format!("#{:<5} {} <{}> [{}]", user.id, user.name, user.email, url),
        None => format!("#{:<5} {} <{}>", user.id, user.name, user.email),
    }
}
