//! 推文 prompt 組裝。純函式：同樣的 `TweetRequest` 一定得到同樣的字串。

use crate::domain::model::TweetRequest;

/// 依序串接：風格指示、輸出格式、repository 資訊、README
pub fn build_tweet_prompt(req: &TweetRequest) -> String {
    let mut prompt = style_header(req);
    prompt.push_str(output_format(req.thread));
    prompt.push_str(&repo_block(req));
    prompt.push_str(&readme_block(req));
    prompt
}

fn style_header(req: &TweetRequest) -> String {
    format!(
        "You are writing tweets in {language} about open-source repositories.\n\
         Write in casual, informal language. Sound like a Twitter influencer, but stay informative.\n\
         Tone: {tone}. Max length per tweet: {max_chars} chars.\n\
         Be accurate. Do not invent facts not supported by README or description.\n\
         If unsure, keep it high-level.\n\
         Structure:\n\
         1) Opening line that is catchy and relevant.\n\
         \x20  Vary the opening across outputs. Pick ONE style each time:\n\
         \x20  - Problem hook: start from a clear pain/issue the repo solves.\n\
         \x20  - Storytelling: a short mini-story or relatable scenario.\n\
         \x20  - Benefit-first: lead with the most concrete benefit.\n\
         \x20  Keep it natural, not textbook/theory. Avoid generic phrases.\n\
         2) GitHub link on its own line.\n\
         3) Bullet-style points using lines starting with '> ' (2-5 points).\n\
         Points can be features, usage steps, or key notes; pick what's most helpful.\n\
         No emojis unless they already appear in the README.\n",
        language = req.output_language,
        tone = req.tone,
        max_chars = req.max_chars,
    )
}

fn output_format(thread: bool) -> &'static str {
    if thread {
        "Output a short thread (2-3 tweets) as a JSON array of strings.\n"
    } else {
        "Output a single tweet as plain text only.\n"
    }
}

fn repo_block(req: &TweetRequest) -> String {
    format!(
        "\nRepo:\n\
         - Name: {}\n\
         - URL: {}\n\
         - Description: {}\n\
         - Language: {}\n\
         - Stars: {} (today +{})\n",
        req.repo_name, req.repo_url, req.description, req.language, req.stars, req.stars_today
    )
}

fn readme_block(req: &TweetRequest) -> String {
    format!("\nREADME (truncated):\n{}\n", req.readme_text)
}
