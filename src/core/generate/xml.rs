//! XML rendering of transaction records
//!
//! The record is mapped onto borrowed view structs and serialized with quick-xml.
//! Absent values are omitted rather than written as empty elements.

use super::ProductDetail;
use crate::domain::{EventId, Result, TntError, TxnRecord};
use chrono::SecondsFormat;
use quick_xml::se::Serializer;
use serde::Serialize;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[derive(Serialize)]
struct XmlDocument<'a> {
    #[serde(rename = "@product")]
    product: &'a str,
    #[serde(rename = "@eventId")]
    event_id: &'a str,
    #[serde(rename = "Transaction")]
    transaction: XmlTransaction<'a>,
    #[serde(rename = "Courier", skip_serializing_if = "Option::is_none")]
    courier: Option<XmlCourier<'a>>,
    #[serde(rename = "Attachments", skip_serializing_if = "Option::is_none")]
    attachments: Option<XmlAttachments<'a>>,
    #[serde(rename = "AdditionalFields")]
    additional_fields: XmlFields<'a>,
    #[serde(rename = "ProductDetails")]
    product_details: XmlFields<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlTransaction<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    branch_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bo_ref_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    txn_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    txn_type_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    txn_status_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ctx_status_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prod_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    currency: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_reference: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    release_dttm: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlCourier<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    partner: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    waybill_number: Option<&'a str>,
}

#[derive(Serialize)]
struct XmlAttachments<'a> {
    #[serde(rename = "Attachment")]
    items: Vec<XmlAttachment<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlAttachment<'a> {
    title: &'a str,
    file_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_category: Option<&'a str>,
}

#[derive(Serialize)]
struct XmlFields<'a> {
    #[serde(rename = "Field")]
    items: Vec<XmlField<'a>>,
}

#[derive(Serialize)]
struct XmlField<'a> {
    #[serde(rename = "@name")]
    name: &'a str,
    #[serde(rename = "$text", skip_serializing_if = "Option::is_none")]
    value: Option<&'a str>,
}

/// Whether `c` may appear in an XML 1.0 document
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

fn check_text(name: &str, value: Option<&str>) -> std::result::Result<(), String> {
    match value.and_then(|v| v.chars().find(|c| !is_xml_char(*c))) {
        Some(bad) => Err(format!(
            "field '{name}' contains character U+{:04X} which is not allowed in XML",
            bad as u32
        )),
        None => Ok(()),
    }
}

fn check_record(record: &TxnRecord, details: &[ProductDetail]) -> std::result::Result<(), String> {
    let scalar = [
        ("BranchCode", record.branch_code.as_deref()),
        ("BoRefId", record.bo_ref_id.as_deref()),
        ("TxnId", record.txn_id.as_deref()),
        ("TxnTypeCode", record.txn_type_code.as_deref()),
        ("TxnStatusCode", record.txn_status_code.as_deref()),
        ("CtxStatusCode", record.ctx_status_code.as_deref()),
        ("ProdCode", record.prod_code.as_deref()),
        ("Currency", record.currency.as_deref()),
        ("CustomerReference", record.customer_reference.as_deref()),
        ("CourierPartner", record.courier_partner.as_deref()),
        ("WaybillNumber", record.waybill_number.as_deref()),
    ];
    for (name, value) in scalar {
        check_text(name, value)?;
    }

    for attachment in record.attachments.iter().flatten() {
        check_text("Attachment.Title", Some(&attachment.title))?;
        check_text("Attachment.FileName", Some(&attachment.file_name))?;
        check_text("Attachment.SourceCategory", attachment.source_category.as_deref())?;
    }
    for field in &record.additional_fields {
        check_text("AdditionalField.Name", Some(&field.name))?;
        check_text(&field.name, field.value.as_deref())?;
    }
    for detail in details {
        check_text(detail.name, detail.value.as_deref())?;
    }
    Ok(())
}

fn view<'a>(
    product_code: &'a str,
    event_id: &'a EventId,
    record: &'a TxnRecord,
    details: &'a [ProductDetail],
) -> XmlDocument<'a> {
    let courier = (record.courier_partner.is_some() || record.waybill_number.is_some()).then(|| {
        XmlCourier {
            partner: record.courier_partner.as_deref(),
            waybill_number: record.waybill_number.as_deref(),
        }
    });

    XmlDocument {
        product: product_code,
        event_id: event_id.as_str(),
        transaction: XmlTransaction {
            branch_code: record.branch_code.as_deref(),
            bo_ref_id: record.bo_ref_id.as_deref(),
            txn_id: record.txn_id.as_deref(),
            txn_type_code: record.txn_type_code.as_deref(),
            txn_status_code: record.txn_status_code.as_deref(),
            ctx_status_code: record.ctx_status_code.as_deref(),
            prod_code: record.prod_code.as_deref(),
            currency: record.currency.as_deref(),
            customer_reference: record.customer_reference.as_deref(),
            release_dttm: record
                .release_dttm
                .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, false)),
        },
        courier,
        attachments: record.attachments.as_ref().map(|items| XmlAttachments {
            items: items
                .iter()
                .map(|a| XmlAttachment {
                    title: &a.title,
                    file_name: &a.file_name,
                    source_category: a.source_category.as_deref(),
                })
                .collect(),
        }),
        additional_fields: XmlFields {
            items: record
                .additional_fields
                .iter()
                .map(|f| XmlField {
                    name: &f.name,
                    value: f.value.as_deref(),
                })
                .collect(),
        },
        product_details: XmlFields {
            items: details
                .iter()
                .map(|d| XmlField {
                    name: d.name,
                    value: d.value.as_deref(),
                })
                .collect(),
        },
    }
}

/// Renders a record as an XML document under `root`
///
/// # Errors
///
/// Returns `TntError::Serialization` carrying the product code and event id when a
/// value holds characters XML cannot represent or the encoder fails.
pub fn render(
    root: &str,
    product_code: &str,
    event_id: &EventId,
    record: &TxnRecord,
    details: &[ProductDetail],
) -> Result<String> {
    let fail = |message: String| TntError::Serialization {
        product_code: product_code.to_string(),
        event_id: event_id.to_string(),
        message,
    };

    check_record(record, details).map_err(fail)?;

    let mut body = String::new();
    // No indentation: it pads `$text` content with layout whitespace
    let serializer = Serializer::with_root(&mut body, Some(root)).map_err(|e| fail(e.to_string()))?;
    view(product_code, event_id, record, details)
        .serialize(serializer)
        .map_err(|e| fail(e.to_string()))?;

    Ok(format!("{XML_DECLARATION}\n{body}\n"))
}
