//! Promo ledger - Minting, checking and consuming discount codes.
//!
//! Validation is a read-only preview; redemption is the authoritative locked
//! check-and-flip and the only operation that marks a code as used. A code that has been
//! redeemed stays used forever.

use std::collections::BTreeMap;
use std::path::PathBuf;

use rand::Rng;
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::{
    core::{
        pricing::{is_storable, round_money},
        store::{Commit, JsonStore},
    },
    entities::{PromoCode, PromoEntry},
    errors::{Error, Result},
};

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const MAX_GENERATION_ATTEMPTS: usize = 32;

/// Shortest code length accepted by [`PromoLedger::new`].
pub const MIN_CODE_LENGTH: usize = 6;
/// Longest code length accepted by [`PromoLedger::new`].
pub const MAX_CODE_LENGTH: usize = 8;

type PromoBook = BTreeMap<String, PromoEntry>;

/// Result of a read-only promo lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoStatus {
    /// No code was supplied.
    NotRequested,
    /// The code exists and has not been used.
    Valid {
        /// Discount the code would grant
        discount: Decimal,
    },
    /// No such code.
    Unknown,
    /// The code was already redeemed.
    AlreadyUsed,
}

/// Result of a redemption attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redemption {
    /// The code was unused and is now marked used.
    Redeemed {
        /// Discount the code grants
        discount: Decimal,
    },
    /// No such code.
    Unknown,
    /// The code was already redeemed; nothing changed.
    AlreadyUsed,
}

/// Durable collection of promo codes backed by `promos.json`.
#[derive(Debug)]
pub struct PromoLedger {
    store: JsonStore<PromoBook>,
    code_length: usize,
}

impl PromoLedger {
    /// Opens (or creates) the promos file.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `code_length` is outside 6..=8 and
    /// [`Error::LedgerCorrupt`] if the existing file cannot be parsed.
    pub async fn new(path: impl Into<PathBuf>, code_length: usize) -> Result<Self> {
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&code_length) {
            return Err(Error::Config {
                message: format!(
                    "promo code length must be between {MIN_CODE_LENGTH} and {MAX_CODE_LENGTH}, got {code_length}"
                ),
            });
        }
        let store = JsonStore::open(path, PromoBook::new()).await?;
        Ok(Self { store, code_length })
    }

    /// Mints a new unused code worth `discount`, rounded to cents.
    ///
    /// Generated codes that collide with an existing one are thrown away and regenerated.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDiscount`] for a negative or unstorably large discount, or a
    /// ledger error if the code could not be persisted.
    #[instrument(skip(self))]
    pub async fn create(&self, discount: Decimal) -> Result<PromoCode> {
        if (discount.is_sign_negative() && !discount.is_zero()) || !is_storable(discount) {
            return Err(Error::InvalidDiscount { amount: discount });
        }
        let discount = round_money(discount).normalize();
        let code_length = self.code_length;

        let promo = self
            .store
            .transact(|book| {
                let code = fresh_code(book, code_length)?;
                let entry = PromoEntry {
                    discount,
                    used: false,
                };
                let promo = PromoCode::from_entry(&code, &entry);
                book.insert(code, entry);
                Ok(Commit::Write(promo))
            })
            .await?;

        info!("Created promo code {} worth {}", promo.code, promo.discount);
        Ok(promo)
    }

    /// Looks a code up without changing anything.
    ///
    /// The input is trimmed; blank input means no promo was requested. Matching is
    /// case-sensitive.
    pub async fn validate(&self, code: &str) -> Result<PromoStatus> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(PromoStatus::NotRequested);
        }
        let book = self.store.load().await?;
        Ok(match book.get(code) {
            None => PromoStatus::Unknown,
            Some(entry) if entry.used => PromoStatus::AlreadyUsed,
            Some(entry) => PromoStatus::Valid {
                discount: entry.discount,
            },
        })
    }

    /// Marks a code as used if it is currently unused.
    ///
    /// Of any number of concurrent calls for the same code, exactly one observes the code
    /// unused and returns [`Redemption::Redeemed`].
    #[instrument(skip(self))]
    pub async fn redeem(&self, code: &str) -> Result<Redemption> {
        let code = code.trim();
        let outcome = self
            .store
            .transact(|book| {
                Ok(match book.get_mut(code) {
                    None => Commit::Skip(Redemption::Unknown),
                    Some(entry) if entry.used => Commit::Skip(Redemption::AlreadyUsed),
                    Some(entry) => {
                        entry.used = true;
                        Commit::Write(Redemption::Redeemed {
                            discount: entry.discount,
                        })
                    }
                })
            })
            .await?;

        if matches!(outcome, Redemption::Redeemed { .. }) {
            info!("Redeemed promo code {}", code);
        }
        Ok(outcome)
    }

    /// All codes, sorted by code.
    pub async fn list_all(&self) -> Result<Vec<PromoCode>> {
        let book = self.store.load().await?;
        Ok(book
            .iter()
            .map(|(code, entry)| PromoCode::from_entry(code, entry))
            .collect())
    }
}

fn fresh_code(book: &PromoBook, length: usize) -> Result<String> {
    let mut rng = rand::thread_rng();
    for _ in 0..MAX_GENERATION_ATTEMPTS {
        let code: String = (0..length)
            .map(|_| char::from(CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())]))
            .collect();
        if !book.contains_key(&code) {
            return Ok(code);
        }
    }
    Err(Error::Config {
        message: format!(
            "could not find an unused promo code after {MAX_GENERATION_ATTEMPTS} attempts"
        ),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::pricing::AMOUNT_LIMIT;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn setup_ledger() -> Result<(TempDir, PromoLedger)> {
        let dir = TempDir::new()?;
        let ledger = PromoLedger::new(dir.path().join("promos.json"), 8).await?;
        Ok((dir, ledger))
    }

    #[tokio::test]
    async fn test_create_generates_uppercase_alphanumeric_codes() -> Result<()> {
        let (_dir, ledger) = setup_ledger().await?;

        let promo = ledger.create(Decimal::ONE).await?;

        assert_eq!(promo.code.len(), 8);
        assert!(
            promo
                .code
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
        assert_eq!(promo.discount, Decimal::ONE);
        assert!(!promo.used);
        assert_eq!(ledger.list_all().await?, vec![promo]);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_rejects_negative_discount() -> Result<()> {
        let (_dir, ledger) = setup_ledger().await?;

        let result = ledger.create(Decimal::new(-100, 2)).await;

        assert!(matches!(result, Err(Error::InvalidDiscount { .. })));
        assert!(ledger.list_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_rounds_and_bounds_discount() -> Result<()> {
        let (dir, ledger) = setup_ledger().await?;

        let promo = ledger.create(Decimal::new(1_2345, 4)).await?;
        let too_large = ledger.create(Decimal::from(AMOUNT_LIMIT)).await;

        assert_eq!(promo.discount, Decimal::new(123, 2));
        assert!(matches!(too_large, Err(Error::InvalidDiscount { .. })));

        let reopened = PromoLedger::new(dir.path().join("promos.json"), 8).await?;
        assert_eq!(reopened.list_all().await?, vec![promo]);
        Ok(())
    }

    #[tokio::test]
    async fn test_code_length_is_bounded() -> Result<()> {
        let dir = TempDir::new()?;

        let too_short = PromoLedger::new(dir.path().join("a.json"), 5).await;
        let too_long = PromoLedger::new(dir.path().join("b.json"), 9).await;

        assert!(matches!(too_short, Err(Error::Config { .. })));
        assert!(matches!(too_long, Err(Error::Config { .. })));
        Ok(())
    }

    #[test]
    fn test_fresh_code_avoids_existing_codes() {
        let mut book = PromoBook::new();
        for _ in 0..50 {
            let code = fresh_code(&book, 6).unwrap();
            assert!(!book.contains_key(&code));
            book.insert(
                code,
                PromoEntry {
                    discount: Decimal::ONE,
                    used: false,
                },
            );
        }
        assert_eq!(book.len(), 50);
    }

    #[tokio::test]
    async fn test_validate_does_not_mutate() -> Result<()> {
        let (_dir, ledger) = setup_ledger().await?;
        let promo = ledger.create(Decimal::ONE).await?;

        assert_eq!(
            ledger.validate(&promo.code).await?,
            PromoStatus::Valid {
                discount: Decimal::ONE
            }
        );
        assert_eq!(
            ledger.validate(&format!("  {}  ", promo.code)).await?,
            PromoStatus::Valid {
                discount: Decimal::ONE
            }
        );
        assert!(!ledger.list_all().await?[0].used);
        Ok(())
    }

    #[tokio::test]
    async fn test_validate_blank_unknown_and_case() -> Result<()> {
        let (_dir, ledger) = setup_ledger().await?;
        let promo = ledger.create(Decimal::ONE).await?;

        assert_eq!(ledger.validate("").await?, PromoStatus::NotRequested);
        assert_eq!(ledger.validate("   ").await?, PromoStatus::NotRequested);
        assert_eq!(ledger.validate("NOPE42").await?, PromoStatus::Unknown);
        assert_eq!(
            ledger.validate(&promo.code.to_lowercase()).await?,
            PromoStatus::Unknown
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_redeem_is_one_shot() -> Result<()> {
        let (_dir, ledger) = setup_ledger().await?;
        let promo = ledger.create(Decimal::ONE).await?;

        assert_eq!(
            ledger.redeem(&promo.code).await?,
            Redemption::Redeemed {
                discount: Decimal::ONE
            }
        );
        assert_eq!(ledger.redeem(&promo.code).await?, Redemption::AlreadyUsed);
        assert_eq!(ledger.validate(&promo.code).await?, PromoStatus::AlreadyUsed);
        assert_eq!(ledger.redeem("ZZZZZZ").await?, Redemption::Unknown);
        Ok(())
    }

    #[tokio::test]
    async fn test_redeem_reads_existing_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("promos.json");
        std::fs::write(&path, r#"{"ABC123": {"discount": 1, "used": false}}"#)?;
        let ledger = PromoLedger::new(&path, 6).await?;

        let outcome = ledger.redeem("ABC123").await?;

        assert_eq!(
            outcome,
            Redemption::Redeemed {
                discount: Decimal::ONE
            }
        );
        let persisted: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)
            .map_err(|e| Error::Config {
                message: e.to_string(),
            })?;
        assert_eq!(persisted["ABC123"]["used"], serde_json::Value::Bool(true));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_redemptions_have_one_winner() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("promos.json");
        std::fs::write(&path, r#"{"ABC123": {"discount": 1.0, "used": false}}"#)?;
        let ledger = Arc::new(PromoLedger::new(&path, 6).await?);

        let first = tokio::spawn({
            let ledger = Arc::clone(&ledger);
            async move { ledger.redeem("ABC123").await }
        });
        let second = tokio::spawn({
            let ledger = Arc::clone(&ledger);
            async move { ledger.redeem("ABC123").await }
        });
        let outcomes = [first.await.unwrap()?, second.await.unwrap()?];

        let winners = outcomes
            .iter()
            .filter(|o| matches!(o, Redemption::Redeemed { .. }))
            .count();
        let losers = outcomes
            .iter()
            .filter(|o| **o == Redemption::AlreadyUsed)
            .count();
        assert_eq!((winners, losers), (1, 1));

        let codes = ledger.list_all().await?;
        assert_eq!(codes.len(), 1);
        assert!(codes[0].used);
        Ok(())
    }
}
