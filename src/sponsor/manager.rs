use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::database::Database;
use crate::error::Error;
use crate::notification::{Email, Notifier};
use crate::store;
use crate::utils::{self, require_filled, SortOrder};

use super::{Sponsor, SponsorId, SponsorSortKey, SponsorSubmission};

#[tracing::instrument(skip(db, submission), fields(name = %submission.name))]
pub async fn submit_sponsor(
    db: &dyn Database,
    submission: SponsorSubmission,
) -> Result<Sponsor, Error> {
    require_filled("name", &submission.name)?;
    require_filled("email", &submission.email)?;
    let amount = submission.amount.resolve()?;

    let sponsor = Sponsor {
        id: SponsorId::new(),
        name: submission.name,
        email: submission.email,
        message: submission.message,
        line_registration: submission.line_registration,
        created_at: utils::now(),
        amount,
    };

    store::upsert(db.sponsors(), sponsor.clone()).await?;

    Ok(sponsor)
}

#[tracing::instrument(skip(db))]
pub async fn get_sponsors(
    db: &dyn Database,
    sort: SponsorSortKey,
    order: SortOrder,
) -> Result<Vec<Sponsor>, Error> {
    let mut sponsors = db.sponsors().load_all().await?;

    sponsors.sort_by(|a, b| {
        let ordering = match sort {
            SponsorSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SponsorSortKey::Name => a.name.cmp(&b.name),
            SponsorSortKey::Amount => a.amount.cmp(&b.amount),
        };
        order.apply(ordering)
    });

    Ok(sponsors)
}

pub fn thank_you_email(sponsor: &Sponsor, shop_name: Option<&str>) -> Email {
    let signature = match shop_name {
        Some(shop_name) if !shop_name.trim().is_empty() => shop_name,
        _ => "開店準備室",
    };

    let text = format!(
        "{name}様\n\n\
         この度は、{shop}の開店に向けてご協賛いただき、誠にありがとうございます。\n\n\
         協賛金額：{amount}円\n\n\
         皆様からのご支援により、より良いお店作りを進めてまいります。\n\
         今後ともどうぞよろしくお願いいたします。\n\n\
         {shop}\n",
        name = sponsor.name,
        shop = signature,
        amount = format_thousands(sponsor.amount),
    );

    Email {
        to: sponsor.email.clone(),
        subject: "協賛のお礼".to_string(),
        text,
    }
}

/// Hands the email to the notifier on a detached task. Delivery failures are
/// logged and never reach the submitter.
pub fn send_in_background(notifier: Arc<dyn Notifier>, email: Email) -> JoinHandle<()> {
    tokio::spawn(async move {
        match notifier.send_email(&email).await {
            Ok(()) => info!(to = %email.to, "thank-you email sent"),
            Err(err) => error!(to = %email.to, error = %err, "thank-you email failed"),
        }
    })
}

fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }

    formatted
}
