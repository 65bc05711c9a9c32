/// Key-construction helpers for the social keyspace.
///
/// Layout: `{prefix}:{service}:{collection}:{id}` for records,
/// `{prefix}:{service}:{collection}:unique:{field}:{value}` for uniqueness guards and
/// `{prefix}:{service}:idx:{index}:{owner}` for membership/ordering indexes.
#[derive(Debug, Clone)]
pub struct KeyContext<'a> {
    pub prefix: &'a str,
    pub service: &'a str,
}

/// Service segment shared by every hearth key.
pub const SERVICE: &str = "social";

pub mod collection {
    pub const USERS: &str = "users";
    pub const POSTS: &str = "posts";
    pub const COMMENTS: &str = "comments";
    pub const LIKES: &str = "likes";
    pub const FOLLOWS: &str = "follows";
    pub const NOTIFICATIONS: &str = "notifications";
}

pub mod index {
    /// zset of every user id, scored by seq
    pub const ALL_USERS: &str = "users";
    /// zset of every post id, scored by seq
    pub const ALL_POSTS: &str = "posts";
    pub const USER_POSTS: &str = "user_posts";
    pub const POST_COMMENTS: &str = "post_comments";
    /// set of user ids liking a post
    pub const POST_LIKES: &str = "post_likes";
    /// set of post ids liked by a user
    pub const USER_LIKES: &str = "user_likes";
    pub const FOLLOWERS: &str = "followers";
    pub const FOLLOWING: &str = "following";
    pub const USER_NOTIFICATIONS: &str = "user_notifications";
    /// set of notification ids referencing a post, consumed by the delete cascade
    pub const POST_NOTIFICATIONS: &str = "post_notifications";
}

impl<'a> KeyContext<'a> {
    pub fn new(prefix: &'a str, service: &'a str) -> Self {
        Self { prefix, service }
    }

    pub fn entity(&self, collection: &str, entity_id: &str) -> String {
        format!("{}:{}:{}:{}", self.prefix, self.service, collection, entity_id)
    }

    /// Prefix that, concatenated with an id, yields [`Self::entity`]. Handed to Lua.
    pub fn entity_prefix(&self, collection: &str) -> String {
        format!("{}:{}:{}:", self.prefix, self.service, collection)
    }

    /// Record key whose identity is an ordered pair, e.g. `(user, post)` for likes.
    pub fn composite(&self, collection: &str, left_id: &str, right_id: &str) -> String {
        format!("{}:{}:{}:{}:{}", self.prefix, self.service, collection, left_id, right_id)
    }

    pub fn unique(&self, collection: &str, field: &str, value: &str) -> String {
        format!(
            "{}:{}:{}:unique:{}:{}",
            self.prefix, self.service, collection, field, value
        )
    }

    /// Global index, e.g. every post.
    pub fn global_index(&self, name: &str) -> String {
        format!("{}:{}:idx:{}", self.prefix, self.service, name)
    }

    /// Index owned by a single record, e.g. the comments of one post.
    pub fn index(&self, name: &str, owner_id: &str) -> String {
        format!("{}:{}:idx:{}:{}", self.prefix, self.service, name, owner_id)
    }

    pub fn index_prefix(&self, name: &str) -> String {
        format!("{}:{}:idx:{}:", self.prefix, self.service, name)
    }

    /// Counter handing out the monotonically increasing ordering tie-breaker.
    pub fn sequence(&self) -> String {
        format!("{}:{}:seq", self.prefix, self.service)
    }

    pub fn pattern(&self) -> String {
        format!("{}:{}:*", self.prefix, self.service)
    }
}
