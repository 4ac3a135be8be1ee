//! Voucher wallet commands.
//!
//! # Usage
//!
//! ```bash
//! gifticon list
//! gifticon show 1719800000000
//! gifticon add -n "치킨 기프티콘" -s "BBQ" -a 20000 -e 2025-07-31 --gifter "민지"
//! gifticon use 1719800000000
//! gifticon share 1719800000000 -m "맛있게 먹어!"
//! ```

use chrono::NaiveDate;
use gifticon_core::{NewVoucher, Voucher, VoucherId, category_icon};
use gifticon_wallet::AppState;
use gifticon_wallet::db::RepositoryError;
use gifticon_wallet::expiry::classify_voucher;
use gifticon_wallet::services::share_content;
use thiserror::Error;
use tracing::info;

use super::print_lines;

/// Errors from voucher commands.
#[derive(Debug, Error)]
pub enum VoucherCommandError {
    #[error("{0}")]
    Repository(#[from] RepositoryError),
    #[error("voucher {0} is already used or expired")]
    NotRedeemable(VoucherId),
    #[error("name and store are required")]
    MissingField,
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One-line summary of a voucher with its badge.
fn voucher_line(voucher: &Voucher, today: NaiveDate) -> String {
    let badge = classify_voucher(voucher, today);
    let mut line = format!(
        "{} {} {} | {} | {} | ~{}",
        voucher.id,
        category_icon(&voucher.store),
        voucher.store,
        voucher.name,
        voucher.amount,
        voucher.expiry_date,
    );
    if let Some(message) = badge.message {
        line.push_str(&format!(" [{message}]"));
    }
    line
}

/// Barcode and QR lines, or a note that the image is the only code.
fn redemption_lines(voucher: &Voucher) -> Vec<String> {
    if !voucher.has_redemption_code() {
        return vec!["교환 코드: 없음 (이미지로 사용)".to_string()];
    }
    let mut lines = Vec::new();
    if let Some(barcode) = &voucher.barcode {
        lines.push(format!("바코드: {barcode}"));
    }
    if let Some(qr_code) = &voucher.qr_code {
        lines.push(format!("QR: {qr_code}"));
    }
    lines
}

fn section(title: &str, vouchers: &[Voucher], today: NaiveDate) -> Vec<String> {
    let mut lines = vec![format!("{title} ({})", vouchers.len())];
    lines.extend(vouchers.iter().map(|v| format!("  {}", voucher_line(v, today))));
    lines
}

/// Print vouchers grouped into active, used and expired, then reminders.
///
/// # Errors
///
/// Returns an error if the voucher file cannot be read.
pub async fn list(wallet: &AppState, json: bool) -> Result<(), VoucherCommandError> {
    let manager = wallet.vouchers();
    let partitions = manager.partitions().await?;

    if json {
        return Ok(print_lines([serde_json::to_string_pretty(&partitions)?])?);
    }

    let today = manager.today();
    let mut lines = section("사용가능", &partitions.active, today);
    lines.extend(section("사용완료", &partitions.used, today));
    lines.extend(section("만료됨", &partitions.expired, today));

    let reminders = manager.notifications().await?;
    if !reminders.is_empty() {
        lines.push(format!("알림 ({})", reminders.len()));
        lines.extend(reminders.iter().map(|m| format!("  {m}")));
    }
    Ok(print_lines(lines)?)
}

/// Print one voucher in detail.
///
/// # Errors
///
/// Returns an error if the voucher does not exist.
pub async fn show(wallet: &AppState, id: VoucherId) -> Result<(), VoucherCommandError> {
    let detail = wallet.vouchers().detail(id).await?;
    let voucher = &detail.voucher;

    let mut lines = vec![
        format!("{} {}", detail.icon, voucher.name),
        format!("매장: {}", voucher.store),
        format!("금액: {}", voucher.amount),
        format!("유효기간: {}", voucher.expiry_date),
    ];
    if let Some(message) = &detail.badge.message {
        lines.push(format!("상태: {message}"));
    }
    if let Some(category) = detail.category {
        lines.push(format!("분류: {}", category.name));
    }
    lines.extend(redemption_lines(voucher));
    if let Some(gifter) = &voucher.gifter {
        lines.push(format!("보낸 사람: {gifter}"));
    }
    lines.push(format!(
        "주변 매장 알림: {}",
        if voucher.notify_nearby { "켜짐" } else { "꺼짐" }
    ));
    Ok(print_lines(lines)?)
}

/// Register a voucher.
///
/// # Errors
///
/// Returns an error if name or store is blank or the file cannot be written.
pub async fn add(wallet: &AppState, input: NewVoucher) -> Result<(), VoucherCommandError> {
    if input.name.trim().is_empty() || input.store.trim().is_empty() {
        return Err(VoucherCommandError::MissingField);
    }

    let voucher = wallet.vouchers().add(input).await?;
    info!(id = %voucher.id, store = %voucher.store, "Voucher registered");
    Ok(print_lines([voucher_line(&voucher, wallet.vouchers().today())])?)
}

/// Mark a voucher as used. Only redeemable vouchers can be used.
///
/// # Errors
///
/// Returns an error if the voucher does not exist or is used or expired.
pub async fn mark_used(wallet: &AppState, id: VoucherId) -> Result<(), VoucherCommandError> {
    let detail = wallet.vouchers().detail(id).await?;
    if !detail.redeemable {
        return Err(VoucherCommandError::NotRedeemable(id));
    }

    let voucher = wallet.vouchers().mark_used(id).await?;
    info!(id = %voucher.id, "Voucher marked as used");
    Ok(print_lines([voucher_line(&voucher, wallet.vouchers().today())])?)
}

/// Toggle nearby-store notifications.
///
/// # Errors
///
/// Returns an error if the voucher does not exist.
pub async fn toggle_notification(
    wallet: &AppState,
    id: VoucherId,
) -> Result<(), VoucherCommandError> {
    let voucher = wallet.vouchers().toggle_notification(id).await?;
    let state = if voucher.notify_nearby { "켜짐" } else { "꺼짐" };
    Ok(print_lines([format!("{} 주변 매장 알림: {state}", voucher.id)])?)
}

/// Print expiry reminders.
///
/// # Errors
///
/// Returns an error if the voucher file cannot be read or stdout cannot be written.
pub async fn notifications(wallet: &AppState) -> Result<(), VoucherCommandError> {
    let notices = wallet.vouchers().notices().await?;
    if notices.is_empty() {
        info!("No vouchers expiring soon");
    }
    Ok(print_lines(
        notices
            .iter()
            .map(|notice| format!("{} {}", notice.voucher_id, notice.message)),
    )?)
}

/// Print the share texts for a voucher.
///
/// # Errors
///
/// Returns an error if the voucher does not exist.
pub async fn share(
    wallet: &AppState,
    id: VoucherId,
    message: Option<&str>,
) -> Result<(), VoucherCommandError> {
    let voucher = wallet.vouchers().get(id).await?;
    let content = share_content(&voucher, message);
    Ok(print_lines([
        "[클립보드]",
        content.clipboard_text.as_str(),
        "",
        "[카카오톡]",
        content.kakao_text.as_str(),
        "",
        "[이메일]",
        content.email_subject.as_str(),
        content.email_body.as_str(),
        "",
        content.mailto_link.as_str(),
    ])?)
}

/// Insert the sample vouchers into an empty wallet.
///
/// # Errors
///
/// Returns an error if the voucher file cannot be written.
pub async fn seed(wallet: &AppState) -> Result<(), VoucherCommandError> {
    let inserted = wallet.vouchers().seed_samples().await?;
    if inserted == 0 {
        info!("Wallet already has vouchers, nothing seeded");
    } else {
        info!(inserted, "Sample vouchers seeded");
    }
    Ok(())
}
