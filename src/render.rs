use chrono::{DateTime, Utc};
use crossterm::style::{ContentStyle, Stylize as _};

use crate::timestamp::{parse_api_datetime, relative_time};
use crate::topic::{Comment, Topic};
use crate::wrap::wrap_text;

/// Widest layout ever used, however wide the terminal.
pub const MAX_WIDTH: usize = 120;

const FALLBACK_WIDTH: usize = 80;
const DEFAULT_STATUS: &str = "active";

/// Current terminal width, capped at [`MAX_WIDTH`]. Queried on every call.
pub fn terminal_width() -> usize {
    let columns = crossterm::terminal::size()
        .map(|(cols, _)| usize::from(cols))
        .ok()
        .filter(|&cols| cols > 0)
        .unwrap_or(FALLBACK_WIDTH);
    columns.min(MAX_WIDTH)
}

/// Renders topics for the current terminal at the current instant.
pub fn render_topics(topics: &[Topic], me: &str, color: bool) -> String {
    Renderer::new(terminal_width(), Utc::now())
        .me(me)
        .color(color)
        .render(topics)
}

#[derive(Debug, Clone, Copy)]
struct Palette {
    enabled: bool,
}

impl Palette {
    fn paint(self, text: &str, style: ContentStyle) -> String {
        if self.enabled {
            style.apply(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn muted(self, text: &str) -> String {
        self.paint(text, ContentStyle::new().dark_grey())
    }

    fn strong(self, text: &str) -> String {
        self.paint(text, ContentStyle::new().bold())
    }

    fn user(self, username: &str, is_me: bool) -> String {
        let style = if is_me {
            ContentStyle::new().yellow()
        } else {
            ContentStyle::new().cyan()
        };
        self.paint(&format!("@{username}"), style)
    }
}

/// Draws topics and their reply trees as box-drawn, wrapped text.
#[derive(Debug, Clone)]
pub struct Renderer {
    width: usize,
    now: DateTime<Utc>,
    me: String,
    palette: Palette,
}

impl Renderer {
    pub fn new(width: usize, now: DateTime<Utc>) -> Self {
        Self {
            width,
            now,
            me: String::new(),
            palette: Palette { enabled: false },
        }
    }

    /// Username to highlight. Empty highlights nobody.
    pub fn me(mut self, me: &str) -> Self {
        self.me = me.to_string();
        self
    }

    pub fn color(mut self, enabled: bool) -> Self {
        self.palette.enabled = enabled;
        self
    }

    pub fn render(&self, topics: &[Topic]) -> String {
        if topics.is_empty() {
            return self.palette.muted("No topics");
        }
        topics
            .iter()
            .map(|topic| self.render_topic(topic).join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn render_topic(&self, topic: &Topic) -> Vec<String> {
        let p = self.palette;
        let rail = p.strong("│");
        let cap = p.strong("└");
        let body_prefix = format!("{rail} ");

        let mut tags = Vec::new();
        if !topic.audience.is_empty() {
            tags.push(topic.audience.as_str());
        }
        if !topic.status.is_empty() && topic.status != DEFAULT_STATUS {
            tags.push(topic.status.as_str());
        }

        let mut header = format!(
            "{} {} {} {}",
            p.strong("┌"),
            self.user(&topic.creator.username),
            p.muted("·"),
            p.muted(&self.timestamp(&topic.created)),
        );
        if !tags.is_empty() {
            header.push(' ');
            header.push_str(&p.muted(&format!("({})", tags.join(", "))));
        }
        if topic.edited {
            header.push(' ');
            header.push_str(&p.muted("(edited)"));
        }
        if let Some(reactions) = reactions(topic.likes, topic.dislikes) {
            header.push(' ');
            header.push_str(&p.muted(&reactions));
        }
        header.push(' ');
        header.push_str(&p.muted(&comment_count(topic.num_comments)));

        let mut lines = vec![header];
        if !topic.message.is_empty() {
            lines.extend(wrap_text(&topic.message, &body_prefix, self.width));
        }

        if topic.comments.is_empty() {
            lines.push(format!("{cap} {}", p.muted("(no comments)")));
        } else {
            self.render_siblings(&topic.comments, &body_prefix, &mut lines);
        }

        if let Some(last) = lines.last_mut() {
            if let Some(rest) = last.strip_prefix(rail.as_str()) {
                *last = format!("{cap}{rest}");
            }
        }
        lines
    }

    fn render_siblings(&self, comments: &[Comment], prefix: &str, lines: &mut Vec<String>) {
        for (i, comment) in comments.iter().enumerate() {
            let is_last = i + 1 == comments.len();
            let (connector, child_prefix) = if is_last {
                ("└ ", "  ")
            } else {
                ("├ ", "│ ")
            };
            self.render_comment(comment, prefix, connector, child_prefix, lines);
        }
    }

    fn render_comment(
        &self,
        comment: &Comment,
        prefix: &str,
        connector: &str,
        child_prefix: &str,
        lines: &mut Vec<String>,
    ) {
        let p = self.palette;

        let mut markers = Vec::new();
        if comment.edited {
            markers.push("edited");
        }
        if comment.deleted {
            markers.push("deleted");
        }

        let mut header = format!(
            "{prefix}{connector}{} {} {}",
            self.user(&comment.creator.username),
            p.muted("·"),
            p.muted(&self.timestamp(&comment.created)),
        );
        if !markers.is_empty() {
            header.push(' ');
            header.push_str(&p.muted(&format!("({})", markers.join(", "))));
        }
        if let Some(reactions) = reactions(comment.likes, comment.dislikes) {
            header.push(' ');
            header.push_str(&p.muted(&reactions));
        }
        lines.push(header);

        let body_prefix = format!("{prefix}{child_prefix}");
        if comment.deleted {
            lines.push(format!("{body_prefix}{}", p.muted("[deleted]")));
        } else if !comment.message.is_empty() {
            lines.extend(wrap_text(&comment.message, &body_prefix, self.width));
        }

        self.render_siblings(&comment.replies, &body_prefix, lines);
    }

    fn user(&self, username: &str) -> String {
        let username = if username.is_empty() { "?" } else { username };
        let is_me = !self.me.is_empty() && username == self.me;
        self.palette.user(username, is_me)
    }

    fn timestamp(&self, raw: &str) -> String {
        parse_api_datetime(raw)
            .map(|dt| relative_time(dt, self.now))
            .unwrap_or_default()
    }
}

fn reactions(likes: u64, dislikes: u64) -> Option<String> {
    let mut parts = Vec::new();
    if likes > 0 {
        parts.push(format!("+{likes}"));
    }
    if dislikes > 0 {
        parts.push(format!("-{dislikes}"));
    }
    if parts.is_empty() {
        None
    } else {
        Some(format!("[{}]", parts.join(" ")))
    }
}

fn comment_count(n: u64) -> String {
    match n {
        1 => "· 1 comment".to_string(),
        _ => format!("· {n} comments"),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::ansi::{strip, visible_width};
    use crate::topic::Creator;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 12, 12, 0, 0).unwrap()
    }

    fn ago(d: Duration) -> String {
        (now() - d).to_rfc3339()
    }

    fn creator(name: &str) -> Creator {
        Creator {
            username: name.to_string(),
        }
    }

    fn topic(comments: Vec<Comment>) -> Topic {
        Topic {
            id: "1".to_string(),
            message: "Hello world".to_string(),
            audience: "public".to_string(),
            status: "active".to_string(),
            num_comments: comments.len() as u64,
            created: ago(Duration::hours(2)),
            creator: creator("alice"),
            comments,
            ..Topic::default()
        }
    }

    fn comment(name: &str, message: &str, replies: Vec<Comment>) -> Comment {
        Comment {
            message: message.to_string(),
            num_replies: replies.len() as u64,
            created: ago(Duration::minutes(5)),
            creator: creator(name),
            replies,
            ..Comment::default()
        }
    }

    fn render(topics: &[Topic]) -> String {
        Renderer::new(80, now()).render(topics)
    }

    #[test]
    fn no_topics() {
        assert_eq!(render(&[]), "No topics");
    }

    #[test]
    fn draws_nested_tree() {
        let dave = comment("dave", "Deep", vec![]);
        let carol = comment("carol", "Mid", vec![dave]);
        let bob = comment("bob", "Top", vec![carol]);
        let erin = comment("erin", "Second", vec![]);
        let mut t = topic(vec![bob, erin]);
        t.num_comments = 4;

        let expected = [
            "┌ @alice · 2h ago (public) · 4 comments",
            "│ Hello world",
            "│ ├ @bob · 5m ago",
            "│ │ Top",
            "│ │ └ @carol · 5m ago",
            "│ │   Mid",
            "│ │   └ @dave · 5m ago",
            "│ │     Deep",
            "│ └ @erin · 5m ago",
            "└   Second",
        ]
        .join("\n");
        assert_eq!(render(&[t]), expected);
    }

    #[test]
    fn empty_topic_shows_placeholder() {
        let out = render(&[topic(vec![])]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "┌ @alice · 2h ago (public) · 0 comments",
                "│ Hello world",
                "└ (no comments)",
            ]
        );
    }

    #[test]
    fn public_active_header() {
        let out = render(&[topic(vec![])]);
        let header = out.lines().next().unwrap();
        assert_eq!(header.matches("(public)").count(), 1);
        assert!(!out.contains("active"));
        assert!(!header.contains('['));
    }

    #[test]
    fn non_default_status_is_tagged() {
        let mut t = topic(vec![]);
        t.status = "archived".to_string();
        assert!(render(&[t]).contains("(public, archived)"));
    }

    #[test]
    fn comment_count_pluralization() {
        let mut t = topic(vec![comment("bob", "hi", vec![])]);
        let out = render(std::slice::from_ref(&t));
        assert!(out.contains("· 1 comment"));
        assert!(!out.contains("1 comments"));

        t.num_comments = 2;
        assert!(render(&[t]).contains("· 2 comments"));
    }

    #[test]
    fn deleted_message_is_hidden() {
        let mut c = comment("bob", "secret plans", vec![]);
        c.deleted = true;
        c.edited = true;
        let out = render(&[topic(vec![c])]);
        assert!(!out.contains("secret"));
        assert!(out.contains("[deleted]"));
        assert!(out.contains("(edited, deleted)"));
    }

    #[test]
    fn empty_message_renders_no_body() {
        let mut t = topic(vec![comment("bob", "", vec![])]);
        t.message = String::new();
        let out = render(&[t]);
        assert_eq!(
            out.lines().collect::<Vec<_>>(),
            vec!["┌ @alice · 2h ago (public) · 1 comment", "└ └ @bob · 5m ago"]
        );
    }

    #[test]
    fn reactions_skip_zero_terms() {
        let mut c = comment("bob", "hi", vec![]);
        c.likes = 5;
        c.dislikes = 2;
        let mut d = comment("carol", "hey", vec![]);
        d.dislikes = 1;
        let mut t = topic(vec![c, d]);
        t.likes = 3;
        let out = render(&[t]);
        assert!(out.contains("[+3]"));
        assert!(out.contains("[+5 -2]"));
        assert!(out.contains("[-1]"));
        assert!(!out.contains("[]"));
    }

    #[test]
    fn topics_are_separated_by_one_blank_line() {
        let mut second = topic(vec![
            comment("bob", "First", vec![]),
            comment("carol", "Second", vec![]),
        ]);
        second.creator = creator("zed");
        let out = render(&[topic(vec![]), second]);
        let blocks: Vec<&str> = out.split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[1].starts_with("┌ @zed"));
        assert!(blocks.iter().all(|b| b.lines().all(|l| !l.trim().is_empty())));
    }

    #[test]
    fn unknown_creator_and_time() {
        let mut t = topic(vec![]);
        t.creator = Creator::default();
        t.created = "whenever".to_string();
        assert!(render(&[t]).starts_with("┌ @? · "));
    }

    #[test]
    fn old_topics_show_dates() {
        let mut t = topic(vec![]);
        t.created = "Mon, 15 Jan 2024 08:00:00 UTC".to_string();
        assert!(render(&[t]).contains("Jan 15, 2024"));
    }

    #[test]
    fn long_messages_wrap_within_width() {
        let text = "lorem ipsum dolor sit amet ".repeat(10);
        let deep = comment("dave", text.trim(), vec![]);
        let t = topic(vec![comment("bob", text.trim(), vec![deep])]);
        let out = Renderer::new(50, now()).color(true).render(&[t]);
        for line in out.lines().filter(|l| strip(l).contains("lorem")) {
            assert!(visible_width(line) <= 50, "{line:?}");
        }
    }

    #[test]
    fn color_does_not_change_text() {
        let mut c = comment("bob", "hi there", vec![comment("me", "reply", vec![])]);
        c.likes = 1;
        let topics = [topic(vec![c]), topic(vec![])];
        let plain = Renderer::new(60, now()).me("me").render(&topics);
        let colored = Renderer::new(60, now()).me("me").color(true).render(&topics);
        assert_ne!(plain, colored);
        assert_eq!(strip(&colored), plain);
    }

    #[test]
    fn highlights_current_user() {
        let t = topic(vec![comment("bob", "hi", vec![]), comment("me", "mine", vec![])]);
        let r = Renderer::new(80, now()).me("me").color(true);
        let out = r.render(&[t]);
        let bob = Palette { enabled: true }.user("bob", false);
        let me = Palette { enabled: true }.user("me", true);
        assert!(out.contains(&bob));
        assert!(out.contains(&me));
        assert_ne!(strip(&me), me);
    }

    #[test]
    fn closing_cap_applies_to_styled_rail() {
        let out = Renderer::new(80, now())
            .color(true)
            .render(&[topic(vec![comment("bob", "Top", vec![])])]);
        let last = out.lines().last().unwrap();
        assert_eq!(strip(last), "└   Top");
    }
}
