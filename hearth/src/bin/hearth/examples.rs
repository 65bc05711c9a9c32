use crate::commands::{engage, feed, follow, notifications, post, user};

#[derive(Clone, Copy)]
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

#[derive(Clone, Copy)]
pub struct CommandExample {
    pub name: &'static str,
    pub groups: &'static [ExampleGroup],
}

pub fn command_examples() -> &'static [CommandExample] {
    &[
        CommandExample {
            name: "user",
            groups: user::EXAMPLES,
        },
        CommandExample {
            name: "post",
            groups: post::EXAMPLES,
        },
        CommandExample {
            name: "like",
            groups: engage::LIKE_EXAMPLES,
        },
        CommandExample {
            name: "comment",
            groups: engage::COMMENT_EXAMPLES,
        },
        CommandExample {
            name: "follow",
            groups: follow::EXAMPLES,
        },
        CommandExample {
            name: "feed",
            groups: feed::EXAMPLES,
        },
        CommandExample {
            name: "notifications",
            groups: notifications::EXAMPLES,
        },
    ]
}
