//! Terminal rendering of the advisor screens.

use std::fmt::Write;

use flower_advisor::{
    flower_image_url, landing_background_url, FlowerRecommendation, Layout, ViewController,
    ViewState,
};

/// Shortcut queries offered on the landing screen: (label, query).
pub const QUICK_PICKS: &[(&str, &str)] = &[
    ("#뭐_심지?", "뭐 심지?"),
    ("#수국", "수국"),
    ("#라벤더", "라벤더"),
    ("#베란다_정원", "베란다 정원"),
];

const FOOTNOTE: &str = "* 추천 순위는 계절 적합성과 재배 난이도를 고려하여 AI가 선정했습니다.";

/// Query behind quick pick `n` (1-based).
pub fn quick_pick(n: usize) -> Option<&'static str> {
    n.checked_sub(1)
        .and_then(|i| QUICK_PICKS.get(i))
        .map(|(_, query)| *query)
}

/// Render whatever screen the controller is on.
pub fn render_view(view: &ViewController) -> String {
    match view.state() {
        ViewState::Landing => render_landing(),
        ViewState::Loading => render_loading(view),
        ViewState::Results => render_results(view),
        ViewState::Error => render_error(view),
    }
}

pub fn render_landing() -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  \x1b[90mAI Gardening Assistant\x1b[0m"
    );
    let _ = writeln!(out, "  \x1b[1m뭐 \x1b[32m심지?\x1b[0m");
    let _ = writeln!(out);
    let _ = writeln!(out, "  당신의 정원에 예술을 심어보세요.");
    let _ = writeln!(out, "  계절별 추천 꽃부터 특정 식물 정보까지 찾아드립니다.");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  달(1~12), 계절, 꽃 이름을 입력하세요. 예: \x1b[36m7\x1b[0m, \x1b[36m수국\x1b[0m, \x1b[36m뭐 심지?\x1b[0m"
    );
    let picks: Vec<String> = QUICK_PICKS
        .iter()
        .enumerate()
        .map(|(i, (label, _))| format!("\x1b[90m{}.\x1b[0m {label}", i + 1))
        .collect();
    let _ = writeln!(out, "  Quick picks: {}", picks.join("  |  "));
    let _ = writeln!(out, "  \x1b[90mBackground: {}\x1b[0m", landing_background_url());
    let _ = writeln!(out);
    out
}

pub fn render_loading(view: &ViewController) -> String {
    format!(
        "  \x1b[32m\u{25cc}\x1b[0m {}\n  \x1b[90m잠시만 기다려주세요.\x1b[0m\n",
        view.loading_message()
    )
}

pub fn render_error(view: &ViewController) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "  \x1b[31m문제가 발생했습니다\x1b[0m");
    if let Some(message) = view.error_message() {
        let _ = writeln!(out, "  {message}");
    }
    let _ = writeln!(out, "  \x1b[90m/retry 로 다시 시도하기, /reset 으로 처음으로\x1b[0m");
    let _ = writeln!(out);
    out
}

pub fn render_results(view: &ViewController) -> String {
    let presentation = view.presentation();
    let single = presentation.layout == Layout::Single;

    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "  \x1b[32mCURATED LIST\x1b[0m");
    let _ = writeln!(out, "  \x1b[1m{}\x1b[0m", presentation.title);
    for line in presentation.description.lines() {
        let _ = writeln!(out, "  \x1b[90m{}\x1b[0m", line.trim());
    }
    let _ = writeln!(out);

    for flower in view.flowers() {
        out.push_str(&render_card(flower, view.is_expanded(flower.rank), single));
    }

    let _ = writeln!(out, "  \x1b[90m{FOOTNOTE}\x1b[0m");
    let _ = writeln!(out);
    out
}

/// One result card. Collapsed cards show the headline only.
pub fn render_card(flower: &FlowerRecommendation, expanded: bool, single: bool) -> String {
    let mut out = String::new();

    if single {
        let _ = write!(out, "  \x1b[1m{}\x1b[0m", flower.name);
    } else {
        let _ = write!(out, "  \x1b[42;30m TOP {} \x1b[0m \x1b[1m{}\x1b[0m", flower.rank, flower.name);
    }
    if !flower.english_name.trim().is_empty() {
        let _ = write!(out, " \x1b[3;90m{}\x1b[0m", flower.english_name);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "    개화: {}", flower.blooming_period);

    if !expanded {
        let hint = if single {
            "카드를 눌러 상세정보 보기".to_string()
        } else {
            format!("/open {} 으로 상세 정보", flower.rank)
        };
        let _ = writeln!(out, "    \x1b[90m{hint}\x1b[0m");
        let _ = writeln!(out);
        return out;
    }

    let _ = writeln!(out, "    \x1b[32m묘종/파종 시기\x1b[0m  {}", flower.planting_period);
    let _ = writeln!(out, "    \x1b[32m특징\x1b[0m           {}", flower.characteristics);
    let _ = writeln!(out, "    \x1b[33m주의사항\x1b[0m       {}", flower.caution);
    if !flower.related_flowers.is_empty() {
        let ranked: Vec<String> = flower
            .related_flowers
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{}. {name}", i + 1))
            .collect();
        let _ = writeln!(out, "    \x1b[90m인기 품종 순위\x1b[0m  {}", ranked.join("  "));
    }
    let _ = writeln!(out, "    \x1b[90m이미지: {}\x1b[0m", flower_image_url(flower));
    let _ = writeln!(out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flower(rank: u32, name: &str) -> FlowerRecommendation {
        FlowerRecommendation {
            rank,
            name: name.to_string(),
            english_name: "Hydrangea".to_string(),
            planting_period: "4월~5월".to_string(),
            blooming_period: "6월~7월".to_string(),
            characteristics: "풍성한 꽃".to_string(),
            caution: "물 부족 주의".to_string(),
            related_flowers: vec!["앤드리스 썸머".to_string(), "아나벨".to_string()],
        }
    }

    fn results(flowers: Vec<FlowerRecommendation>, query: &str) -> ViewController {
        let mut view = ViewController::new();
        let ticket = view.start(query);
        view.complete(ticket.token, Ok(flowers));
        view
    }

    #[test]
    fn test_quick_pick_lookup() {
        assert_eq!(quick_pick(1), Some("뭐 심지?"));
        assert_eq!(quick_pick(4), Some("베란다 정원"));
        assert_eq!(quick_pick(0), None);
        assert_eq!(quick_pick(5), None);
    }

    #[test]
    fn test_landing_lists_quick_picks() {
        let out = render_landing();
        for (label, _) in QUICK_PICKS {
            assert!(out.contains(label));
        }
        assert!(out.contains("seed=42"));
    }

    #[test]
    fn test_collapsed_card_hides_details() {
        let out = render_card(&flower(3, "수국"), false, false);
        assert!(out.contains("TOP 3"));
        assert!(out.contains("6월~7월"));
        assert!(!out.contains("물 부족 주의"));
    }

    #[test]
    fn test_expanded_card_shows_details_and_image() {
        let out = render_card(&flower(3, "수국"), true, false);
        assert!(out.contains("물 부족 주의"));
        assert!(out.contains("1. 앤드리스 썸머"));
        assert!(out.contains("2. 아나벨"));
        assert!(out.contains("seed=103"));
    }

    #[test]
    fn test_single_view_has_no_rank_badge() {
        let view = results(vec![flower(1, "수국")], "수국");
        let out = render_view(&view);
        assert!(out.contains("수국 상세 정보"));
        assert!(!out.contains("TOP 1 "));
    }

    #[test]
    fn test_list_view_title_and_footnote() {
        let view = results(vec![flower(1, "a"), flower(2, "b")], "7");
        let out = render_view(&view);
        assert!(out.contains("7월 추천 꽃 TOP 10"));
        assert!(out.contains(FOOTNOTE));
    }

    #[test]
    fn test_error_screen_shows_message() {
        let mut view = ViewController::new();
        let ticket = view.start("x");
        view.complete(ticket.token, Err(flower_advisor::RecommendationError::EmptyResponse));
        let out = render_view(&view);
        assert!(out.contains(flower_advisor::FAILURE_MESSAGE));
        assert!(out.contains("/retry"));
    }
}
