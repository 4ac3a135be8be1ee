//! Share texts for sending a voucher to someone else.

use chrono::{Datelike, NaiveDate};
use gifticon_core::Voucher;
use serde::Serialize;

/// All share renderings of one voucher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareContent {
    pub clipboard_text: String,
    pub kakao_text: String,
    pub email_subject: String,
    pub email_body: String,
    pub mailto_link: String,
}

/// Korean locale short date, e.g. `2025. 7. 5.`
#[must_use]
pub fn format_korean_date(date: NaiveDate) -> String {
    format!("{}. {}. {}.", date.year(), date.month(), date.day())
}

fn recipient_message(message: Option<&str>) -> Option<&str> {
    message.map(str::trim).filter(|m| !m.is_empty())
}

/// Plain text for the clipboard.
#[must_use]
pub fn clipboard_text(voucher: &Voucher, message: Option<&str>) -> String {
    let mut text = format!(
        "🎁 기프티콘 공유\n\n상품: {}\n사용처: {}\n금액: {}\n만료일: {}\n",
        voucher.name,
        voucher.store,
        voucher.amount,
        format_korean_date(voucher.expiry_date),
    );
    if let Some(message) = recipient_message(message) {
        text.push_str(&format!("\n메시지: {message}"));
    }
    text
}

/// Text to paste into a KakaoTalk chat.
#[must_use]
pub fn kakao_text(voucher: &Voucher, message: Option<&str>) -> String {
    let mut text = format!(
        "🎁 {} 기프티콘을 공유합니다!\n💳 사용처: {}\n💰 금액: {}\n📅 만료일: {}\n",
        voucher.name,
        voucher.store,
        voucher.amount,
        format_korean_date(voucher.expiry_date),
    );
    if let Some(message) = recipient_message(message) {
        text.push_str(&format!("\n💌 {message}"));
    }
    text
}

/// E-mail subject line.
#[must_use]
pub fn email_subject(voucher: &Voucher) -> String {
    format!("기프티콘 공유: {}", voucher.name)
}

/// E-mail body.
#[must_use]
pub fn email_body(voucher: &Voucher, message: Option<&str>) -> String {
    let extra = recipient_message(message)
        .map(|m| format!("\n메시지: {m}\n"))
        .unwrap_or_default();
    format!(
        "안녕하세요!\n\n{name} 기프티콘을 공유합니다.\n\n상품명: {name}\n사용처: {store}\n금액: {amount}\n만료일: {expiry}\n{extra}\n즐겁게 사용하세요! 😊",
        name = voucher.name,
        store = voucher.store,
        amount = voucher.amount,
        expiry = format_korean_date(voucher.expiry_date),
    )
}

/// `mailto:` link with subject and body, recipient left blank.
#[must_use]
pub fn mailto_link(subject: &str, body: &str) -> String {
    format!(
        "mailto:?subject={}&body={}",
        urlencoding::encode(subject),
        urlencoding::encode(body)
    )
}

/// Render every share format.
#[must_use]
pub fn share_content(voucher: &Voucher, message: Option<&str>) -> ShareContent {
    let email_subject = email_subject(voucher);
    let email_body = email_body(voucher, message);
    ShareContent {
        clipboard_text: clipboard_text(voucher, message),
        kakao_text: kakao_text(voucher, message),
        mailto_link: mailto_link(&email_subject, &email_body),
        email_subject,
        email_body,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use gifticon_core::{NewVoucher, VoucherId, Won};

    use super::*;

    fn voucher() -> Voucher {
        Voucher::from_new(
            VoucherId::new(1),
            Utc::now(),
            NewVoucher::new(
                "아메리카노",
                "스타벅스",
                Won::new(4500).expect("won"),
                NaiveDate::from_ymd_opt(2025, 7, 5).expect("date"),
            ),
        )
    }

    #[test]
    fn test_korean_date_format() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 25).expect("date");
        assert_eq!(format_korean_date(date), "2025. 12. 25.");
    }

    #[test]
    fn test_clipboard_text_layout() {
        assert_eq!(
            clipboard_text(&voucher(), None),
            "🎁 기프티콘 공유\n\n상품: 아메리카노\n사용처: 스타벅스\n금액: 4,500원\n만료일: 2025. 7. 5.\n"
        );
        assert!(clipboard_text(&voucher(), Some("생일 축하해!")).ends_with("\n\n메시지: 생일 축하해!"));
    }

    #[test]
    fn test_kakao_text_layout() {
        let text = kakao_text(&voucher(), Some("맛있게 마셔"));
        assert_eq!(
            text,
            "🎁 아메리카노 기프티콘을 공유합니다!\n💳 사용처: 스타벅스\n💰 금액: 4,500원\n📅 만료일: 2025. 7. 5.\n\n💌 맛있게 마셔"
        );
    }

    #[test]
    fn test_blank_message_is_ignored() {
        assert_eq!(kakao_text(&voucher(), Some("   ")), kakao_text(&voucher(), None));
    }

    #[test]
    fn test_email_body_and_link() {
        let content = share_content(&voucher(), Some("고마워"));
        assert_eq!(content.email_subject, "기프티콘 공유: 아메리카노");
        assert!(content.email_body.starts_with("안녕하세요!\n\n아메리카노 기프티콘을 공유합니다.\n\n상품명: 아메리카노\n"));
        assert!(content.email_body.contains("\n메시지: 고마워\n\n즐겁게 사용하세요! 😊"));

        assert!(content.mailto_link.starts_with("mailto:?subject="));
        assert!(!content.mailto_link.contains(' '));
        assert!(!content.mailto_link.contains('\n'));
        let subject = content
            .mailto_link
            .trim_start_matches("mailto:?subject=")
            .split('&')
            .next()
            .expect("subject");
        assert_eq!(urlencoding::decode(subject).expect("decode"), "기프티콘 공유: 아메리카노");
    }

    #[test]
    fn test_email_body_without_message() {
        let body = email_body(&voucher(), None);
        assert!(body.ends_with("만료일: 2025. 7. 5.\n\n즐겁게 사용하세요! 😊"));
    }
}
