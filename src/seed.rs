//! Demo data for a fresh install.

use anyhow::Result;
use fake::faker::internet::en::Username;
use fake::faker::lorem::en::{Paragraph, Sentence, Word};
use fake::faker::name::en::Name;
use fake::Fake;
use tracing::info;

use crate::context::AppContext;
use crate::model::{CommentRecord, FollowRecord, GroupRecord, PostRecord, UserRecord};

const SEED_USERS: usize = 5;
const SEED_GROUPS: usize = 3;

/// Fill the database with generated users, groups, posts, comments, and
/// follows. Every generated user logs in with the password "password".
pub async fn seed(context: &AppContext, posts: usize) -> Result<()> {
    let mut conn = context.database.get().await?;

    let password = password_auth::generate_hash("password");

    let mut users = Vec::with_capacity(SEED_USERS);
    for i in 0..SEED_USERS {
        // Suffix keeps generated usernames clear of the unique index.
        let username = format!("{}-{i}", Username().fake::<String>());
        let name: String = Name().fake();
        let user = UserRecord::create(&username, &password, &name)
            .save(&mut conn)
            .await?;
        users.push(user);
    }

    let mut groups = Vec::with_capacity(SEED_GROUPS);
    for i in 0..SEED_GROUPS {
        let word: String = Word().fake();
        let title = format!("{}{}", word[..1].to_uppercase(), &word[1..]);
        let slug = format!("{word}-{i}");
        let description: String = Sentence(4..10).fake();
        let group = GroupRecord::create(&title, &slug, &description)
            .save(&mut conn)
            .await?;
        groups.push(group);
    }

    for i in 0..posts {
        let author = &users[i % users.len()];
        let text: String = Paragraph(2..6).fake();
        // Leave roughly a third of the posts ungrouped.
        let group = (i % 3 != 0).then(|| groups[i % groups.len()].id);
        let post = PostRecord::create(author.id, &text)
            .with_group(group)
            .save(&mut conn)
            .await?;

        if i % 2 == 0 {
            let commenter = &users[(i + 1) % users.len()];
            let comment: String = Sentence(3..12).fake();
            CommentRecord::create(post.id, commenter.id, &comment)
                .save(&mut conn)
                .await?;
        }
    }

    // Every user follows the next one so the feed has content out of the box.
    for (i, user) in users.iter().enumerate() {
        let author = &users[(i + 1) % users.len()];
        FollowRecord::follow(user.id, author.id, &mut conn).await?;
    }

    context.cache.clear();

    info!(
        users = users.len(),
        groups = groups.len(),
        posts,
        "seeded database"
    );

    Ok(())
}
