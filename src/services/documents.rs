//! Document resolution
//!
//! Payments against generic documents only name the document; the category
//! lives on the document's line items. All referenced documents are fetched
//! in one batch per collection (purchase invoices, then receipts) instead of
//! one call per document.

use std::collections::{HashMap, HashSet};

use crate::api::BookkeepingApi;
use crate::models::{DocumentCollection, DocumentKind, DocumentLine, Transaction};

/// Document id → ordered line items
#[derive(Debug, Clone, Default)]
pub struct DocumentCache {
    lines: HashMap<String, Vec<DocumentLine>>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the line items of a document
    pub fn insert(&mut self, id: impl Into<String>, lines: Vec<DocumentLine>) {
        self.lines.insert(id.into(), lines);
    }

    pub fn get(&self, id: &str) -> Option<&[DocumentLine]> {
        self.lines.get(id).map(Vec::as_slice)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lines.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Outcome of resolving the documents of a period
#[derive(Debug, Clone, Default)]
pub struct ResolvedDocuments {
    pub cache: DocumentCache,
    /// Distinct document ids referenced by payments
    pub requested: usize,
    /// Collections whose batch fetch failed
    pub failed_collections: Vec<DocumentCollection>,
}

/// Service building the document cache for a set of transactions
pub struct DocumentResolver<'a> {
    api: &'a dyn BookkeepingApi,
}

impl<'a> DocumentResolver<'a> {
    pub fn new(api: &'a dyn BookkeepingApi) -> Self {
        Self { api }
    }

    /// Distinct generic-document ids referenced by payments, in first-seen order
    pub fn referenced_document_ids(transactions: &[Transaction]) -> Vec<String> {
        let mut seen = HashSet::new();
        transactions
            .iter()
            .flat_map(|t| &t.payments)
            .filter(|p| p.document_kind == DocumentKind::GenericDocument)
            .filter(|p| seen.insert(p.document_id.as_str()))
            .map(|p| p.document_id.clone())
            .collect()
    }

    /// Fetch every referenced document and build the cache
    ///
    /// A failed collection is logged and counts as "nothing found there";
    /// the other collection is still attempted. When both collections return
    /// the same id, the later fetch wins. Documents without line items are
    /// not cached.
    pub fn resolve(&self, transactions: &[Transaction]) -> ResolvedDocuments {
        let ids = Self::referenced_document_ids(transactions);
        let mut resolved = ResolvedDocuments {
            requested: ids.len(),
            ..ResolvedDocuments::default()
        };

        if ids.is_empty() {
            return resolved;
        }

        tracing::info!(count = ids.len(), "Fetching unique documents");

        for collection in DocumentCollection::FETCH_ORDER {
            match self.api.documents(collection, &ids) {
                Ok(documents) => {
                    tracing::info!(%collection, found = documents.len(), "Fetched document batch");
                    for document in documents {
                        if !document.lines.is_empty() {
                            resolved.cache.insert(document.id, document.lines);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        %collection,
                        error = %e,
                        "Document batch failed, continuing without it"
                    );
                    resolved.failed_collections.push(collection);
                }
            }
        }

        tracing::info!(
            mapped = resolved.cache.len(),
            requested = resolved.requested,
            "Mapped documents"
        );
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Document, Money, PaymentRecord};
    use crate::testing::{date, Call, FakeApi};

    fn doc_payment(id: &str) -> PaymentRecord {
        PaymentRecord::new(DocumentKind::GenericDocument, id, Money::from_cents(100))
    }

    fn transactions() -> Vec<Transaction> {
        vec![
            Transaction::new("m1", date(2025, 3, 1))
                .with_payment(doc_payment("d1"))
                .with_payment(PaymentRecord::new(
                    DocumentKind::SalesInvoice,
                    "si1",
                    Money::from_cents(50000),
                )),
            Transaction::new("m2", date(2025, 3, 2))
                .with_payment(doc_payment("d2"))
                .with_payment(doc_payment("d1")),
        ]
    }

    fn line(account: &str, cents: i64) -> DocumentLine {
        DocumentLine::new(account, Money::from_cents(cents))
    }

    #[test]
    fn test_referenced_ids_are_deduplicated_generic_only() {
        let ids = DocumentResolver::referenced_document_ids(&transactions());
        assert_eq!(ids, vec!["d1".to_string(), "d2".to_string()]);
    }

    #[test]
    fn test_two_batch_calls_in_order() {
        let api = FakeApi::new()
            .with_documents(
                DocumentCollection::PurchaseInvoices,
                vec![Document::new("d1", vec![line("exp-sw", 10000)])],
            )
            .with_documents(
                DocumentCollection::Receipts,
                vec![Document::new("d2", vec![line("fam-bood", 2500)])],
            );

        let resolved = DocumentResolver::new(&api).resolve(&transactions());

        let ids = vec!["d1".to_string(), "d2".to_string()];
        assert_eq!(
            api.calls(),
            vec![
                Call::Documents(DocumentCollection::PurchaseInvoices, ids.clone()),
                Call::Documents(DocumentCollection::Receipts, ids),
            ]
        );
        assert_eq!(resolved.requested, 2);
        assert_eq!(resolved.cache.len(), 2);
        assert_eq!(resolved.cache.get("d1").unwrap(), &[line("exp-sw", 10000)]);
        assert!(resolved.failed_collections.is_empty());
    }

    #[test]
    fn test_no_documents_no_calls() {
        let api = FakeApi::new();
        let txns =
            vec![Transaction::new("m1", date(2025, 3, 1)).with_booking("a", Money::from_cents(-1))];

        let resolved = DocumentResolver::new(&api).resolve(&txns);

        assert!(api.calls().is_empty());
        assert_eq!(resolved.requested, 0);
        assert!(resolved.cache.is_empty());
    }

    #[test]
    fn test_failed_collection_is_not_fatal() {
        let mut api = FakeApi::new().with_documents(
            DocumentCollection::Receipts,
            vec![Document::new("d2", vec![line("fam-bood", 2500)])],
        );
        api.failing_collections = vec![DocumentCollection::PurchaseInvoices];

        let resolved = DocumentResolver::new(&api).resolve(&transactions());

        assert_eq!(api.calls().len(), 2);
        assert_eq!(resolved.failed_collections, vec![DocumentCollection::PurchaseInvoices]);
        assert!(!resolved.cache.contains("d1"));
        assert!(resolved.cache.contains("d2"));
    }

    #[test]
    fn test_later_collection_wins_and_empty_documents_are_skipped() {
        let api = FakeApi::new()
            .with_documents(
                DocumentCollection::PurchaseInvoices,
                vec![
                    Document::new("d1", vec![line("exp-sw", 10000)]),
                    Document::new("d2", vec![line("exp-tr", 700)]),
                ],
            )
            .with_documents(
                DocumentCollection::Receipts,
                vec![
                    Document::new("d1", vec![line("fam-bood", 4200)]),
                    Document::new("d2", Vec::new()),
                ],
            );

        let resolved = DocumentResolver::new(&api).resolve(&transactions());

        assert_eq!(resolved.cache.get("d1").unwrap(), &[line("fam-bood", 4200)]);
        assert_eq!(resolved.cache.get("d2").unwrap(), &[line("exp-tr", 700)]);
    }
}
