use std::sync::OnceLock;

use regex::Regex;

const YOUTUBE_ID_LEN: usize = 11;

/// Extract the video id from a YouTube URL.
///
/// Accepts the `youtu.be/ID`, `/v/ID`, `/u/x/ID`, `/embed/ID`, `watch?v=ID`
/// and `&v=ID` forms. The id must be exactly 11 characters.
pub fn youtube_video_id(url: &str) -> Option<String> {
    static YOUTUBE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = YOUTUBE_REGEX.get_or_init(|| {
        Regex::new(r"^.*(youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*")
            .expect("Invalid YouTube regex")
    });

    let id = regex.captures(url.trim())?.get(2)?.as_str();
    (id.chars().count() == YOUTUBE_ID_LEN).then(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://www.youtube.com/watch?v=dQw4w9WgXcQ")]
    #[case("https://youtu.be/dQw4w9WgXcQ")]
    #[case("https://www.youtube.com/embed/dQw4w9WgXcQ")]
    #[case("https://www.youtube.com/v/dQw4w9WgXcQ?version=3")]
    #[case("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ")]
    #[case("https://www.youtube.com/watch?v=dQw4w9WgXcQ#t=30")]
    #[case("  https://youtu.be/dQw4w9WgXcQ  ")]
    fn test_extracts_video_id(#[case] url: &str) {
        assert_eq!(youtube_video_id(url).as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[rstest]
    #[case("https://example.com")]
    #[case("")]
    #[case("https://youtu.be/short")]
    #[case("https://www.youtube.com/watch?v=dQw4w9WgXcQextra")]
    fn test_rejects_urls_without_valid_id(#[case] url: &str) {
        assert_eq!(youtube_video_id(url), None);
    }
}
