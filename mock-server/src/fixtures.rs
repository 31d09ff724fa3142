use serde_json::{json, Value};

/// Bytes served at `/files/cat.png`: a PNG signature followed by filler.
pub const CAT_PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDRcat";

/// Size of `/files/big.bin`, past ureq's default 10 MiB read limit.
pub const BIG_FILE_LEN: usize = 11 * 1024 * 1024;

pub const RUST_COMMUNITY: &str = "177a1ae4ee883ca82b22d914";
pub const GENERAL_COMMUNITY: &str = "17692e122def73f25bd757e0";

/// The data set served by the mock API, as raw wire-shaped JSON.
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    pub posts: Vec<Value>,
    pub comments: Vec<Value>,
    pub communities: Vec<Value>,
    pub users: Vec<Value>,
}

fn user(id: &str, username: &str, modding: &[&str]) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": null,
        "emailConfirmedAt": null,
        "aboutMe": format!("I am {username}"),
        "points": 120,
        "isAdmin": false,
        "noPosts": 2,
        "noComments": 7,
        "createdAt": "2023-02-01T10:00:00Z",
        "deletedAt": null,
        "bannedAt": null,
        "isBanned": false,
        "notificationsNewCount": 0,
        "moddingList": modding,
        "upvoteNotificationsOff": false
    })
}

fn post(public_id: &str, community_id: &str, community_name: &str, title: &str, created_at: &str) -> Value {
    json!({
        "id": format!("18{public_id}0000000000000"),
        "type": "text",
        "publicId": public_id,
        "userId": "16f0e1d2c3b4a59687766554",
        "username": "ferris",
        "userGroup": "normal",
        "userDeleted": false,
        "isPinned": false,
        "isPinnedSite": false,
        "communityId": community_id,
        "communityName": community_name,
        "title": title,
        "body": format!("Body of {title}"),
        "image": null,
        "link": null,
        "locked": false,
        "lockedBy": null,
        "lockedAt": null,
        "upvotes": 5,
        "downvotes": 1,
        "hotness": 90210,
        "createdAt": created_at,
        "editedAt": null,
        "lastActivityAt": created_at,
        "deleted": false,
        "deletedAt": null,
        "noComments": 0,
        "commentsNext": null,
        "userVoted": null,
        "userVotedUp": null
    })
}

fn comment(id: &str, post_public_id: &str, parent: Option<&str>, ancestors: &[&str], body: &str) -> Value {
    // top-level comments carry `null`, not an empty list
    let ancestor_ids = if ancestors.is_empty() {
        Value::Null
    } else {
        json!(ancestors)
    };
    json!({
        "id": id,
        "postId": format!("18{post_public_id}0000000000000"),
        "postPublicId": post_public_id,
        "communityId": RUST_COMMUNITY,
        "communityName": "rust",
        "userId": "16f0e1d2c3b4a59687766554",
        "username": "ferris",
        "userGroup": "normal",
        "parentId": parent,
        "depth": ancestors.len(),
        "noReplies": 0,
        "noRepliesDirect": 0,
        "ancestors": ancestor_ids,
        "body": body,
        "upvotes": 2,
        "downvotes": 0,
        "createdAt": "2024-03-01T13:00:00Z",
        "editedAt": null,
        "deletedAt": null,
        "userVoted": null,
        "userVotedUp": null,
        "postDeleted": false,
        "contentStripped": false
    })
}

impl Fixtures {
    pub fn seed() -> Self {
        let ferris = user("16f0e1d2c3b4a59687766554", "ferris", &[RUST_COMMUNITY]);
        let corro = user("16f0e1d2c3b4a59687766555", "corro", &[]);

        let mut link_post = post("ln4k01", RUST_COMMUNITY, "rust", "A cat picture", "2024-03-02T09:30:00Z");
        link_post["type"] = json!("link");
        link_post["body"] = Value::Null;
        link_post["link"] = json!({
            "url": "https://example.com/files/cat.png",
            "hostname": "example.com",
            "image": null
        });

        let mut root = post("abc123", RUST_COMMUNITY, "rust", "Hello, Discuit", "2024-03-01T12:00:00Z");
        root["noComments"] = json!(3);

        let posts = vec![
            root,
            link_post,
            post("gen001", GENERAL_COMMUNITY, "general", "Weekly thread", "2024-02-28T08:00:00Z"),
        ];

        let comments = vec![
            comment("c0000000000000000000001", "abc123", None, &[], "First!"),
            comment(
                "c0000000000000000000002",
                "abc123",
                Some("c0000000000000000000001"),
                &["c0000000000000000000001"],
                "Reply to first",
            ),
            comment(
                "c0000000000000000000003",
                "abc123",
                Some("c0000000000000000000002"),
                &["c0000000000000000000001", "c0000000000000000000002"],
                "Reply to reply",
            ),
        ];

        let rust = json!({
            "id": RUST_COMMUNITY,
            "userId": "16f0e1d2c3b4a59687766554",
            "name": "rust",
            "nsfw": false,
            "about": "All things Rust.",
            "noMembers": 1234,
            "proPic": {
                "id": "img1",
                "format": "jpeg",
                "mimetype": "image/jpeg",
                "width": 240,
                "height": 240,
                "size": 20480,
                "averageColor": "rgb(183,65,14)",
                "url": "/images/img1.jpeg",
                "copies": []
            },
            "bannerImage": null,
            "createdAt": "2023-01-15T00:00:00Z",
            "deletedAt": null,
            "userJoined": null,
            "userMod": null,
            "isMuted": false,
            "mods": [ferris.clone()],
            "rules": [
                {
                    "id": 11,
                    "rule": "Be kind",
                    "description": null,
                    "communityId": RUST_COMMUNITY,
                    "zIndex": 1,
                    "createdBy": "16f0e1d2c3b4a59687766554",
                    "createdAt": "2023-01-15T00:05:00Z"
                },
                {
                    "id": 10,
                    "rule": "Stay on topic",
                    "description": "Posts must be about Rust.",
                    "communityId": RUST_COMMUNITY,
                    "zIndex": 0,
                    "createdBy": "16f0e1d2c3b4a59687766554",
                    "createdAt": "2023-01-15T00:04:00Z"
                }
            ],
            "ReportsDetails": null
        });
        let general = json!({
            "id": GENERAL_COMMUNITY,
            "userId": "16f0e1d2c3b4a59687766555",
            "name": "general",
            "nsfw": false,
            "about": null,
            "noMembers": 99,
            "proPic": null,
            "bannerImage": null,
            "createdAt": "2022-11-01T00:00:00Z",
            "deletedAt": null,
            "userJoined": null,
            "userMod": null,
            "mods": [],
            "rules": [],
            "ReportsDetails": null
        });

        Self {
            posts,
            comments,
            communities: vec![rust, general],
            users: vec![ferris, corro],
        }
    }
}
