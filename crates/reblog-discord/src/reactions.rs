use reblog_types::{ReactionGroup, ReactionUser};

/// One user's reaction with one emoji, as the reactions endpoint reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReaction {
    pub user: ReactionUser,
    pub emoji_id: Option<String>,
    pub emoji_name: String,
}

impl RawReaction {
    /// Custom emoji id when present, otherwise the emoji name.
    pub fn emoji_key(&self) -> &str {
        self.emoji_id.as_deref().unwrap_or(&self.emoji_name)
    }
}

/// Group per-user reaction rows by emoji identity.
///
/// Groups come out in the order their emoji first appears; users keep row order.
pub fn group_reactions(rows: impl IntoIterator<Item = RawReaction>) -> Vec<ReactionGroup> {
    let mut groups: Vec<ReactionGroup> = Vec::new();

    for row in rows {
        let key = row.emoji_key().to_string();
        match groups.iter_mut().find(|g| g.emoji_key == key) {
            Some(group) => {
                group.count += 1;
                group.users.push(row.user);
            }
            None => groups.push(ReactionGroup {
                emoji_key: key,
                emoji_id: row.emoji_id,
                emoji_name: row.emoji_name,
                count: 1,
                users: vec![row.user],
            }),
        }
    }

    groups
}
