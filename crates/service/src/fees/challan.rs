//! Printable payment voucher (challan) rendered as standalone HTML.

use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::settings_service::AcademyProfile;

#[derive(Clone, Debug, Serialize)]
pub struct Challan {
    pub academy: AcademyProfile,
    pub challan_no: String,
    pub student_name: String,
    pub student_email: String,
    pub course_title: Option<String>,
    pub seq: i32,
    pub installment_count: i32,
    pub due_date: NaiveDate,
    pub amount: i64,
    pub paid_amount: i64,
    pub outstanding: i64,
    pub status: String,
}

pub fn challan_number(plan_id: i32, seq: i32) -> String { format!("CH-{plan_id}-{seq}") }

/// Escape text for HTML element and attribute context.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn row(html: &mut String, label: &str, value: &str) {
    let _ = write!(html, "<tr><th>{}</th><td>{}</td></tr>", escape_html(label), escape_html(value));
}

pub fn render(c: &Challan) -> String {
    let cur = &c.academy.currency;
    let money = |v: i64| format!("{cur} {v}");
    let mut html = String::with_capacity(2048);
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    let _ = write!(html, "<title>Challan {}</title>", escape_html(&c.challan_no));
    html.push_str(
        "<style>body{font-family:sans-serif;margin:2rem}table{border-collapse:collapse;width:100%}\
         th,td{border:1px solid #999;padding:.4rem;text-align:left}th{width:40%}\
         @media print{button{display:none}}</style></head><body>",
    );
    let _ = write!(html, "<h1>{}</h1><h2>Fee Challan</h2><table>", escape_html(&c.academy.site_name));
    row(&mut html, "Challan No.", &c.challan_no);
    row(&mut html, "Student", &c.student_name);
    row(&mut html, "Email", &c.student_email);
    if let Some(t) = &c.course_title {
        row(&mut html, "Course", t);
    }
    row(&mut html, "Installment", &format!("{} of {}", c.seq, c.installment_count));
    row(&mut html, "Due Date", &c.due_date.format("%Y-%m-%d").to_string());
    row(&mut html, "Amount", &money(c.amount));
    row(&mut html, "Paid", &money(c.paid_amount));
    row(&mut html, "Amount Payable", &money(c.outstanding));
    row(&mut html, "Status", &c.status);
    html.push_str("</table><h3>Bank Details</h3><table>");
    row(&mut html, "Bank", &c.academy.bank_name);
    row(&mut html, "Account Title", &c.academy.bank_account_title);
    row(&mut html, "Account Number", &c.academy.bank_account_number);
    html.push_str("</table><p><button onclick=\"window.print()\">Print</button></p></body></html>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Challan {
        Challan {
            academy: AcademyProfile {
                site_name: "Quran <Academy>".into(),
                currency: "PKR".into(),
                bank_name: "Bank & Co".into(),
                bank_account_title: "Academy".into(),
                bank_account_number: "0001".into(),
            },
            challan_no: challan_number(7, 2),
            student_name: "<script>alert('x')</script>".into(),
            student_email: "s@example.com".into(),
            course_title: Some("Tajweed \"Advanced\"".into()),
            seq: 2,
            installment_count: 3,
            due_date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            amount: 3334,
            paid_amount: 1000,
            outstanding: 2334,
            status: "partial".into(),
        }
    }

    #[test]
    fn escapes_every_special_char() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }

    #[test]
    fn rendered_challan_escapes_user_text() {
        let html = render(&sample());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(html.contains("Quran &lt;Academy&gt;"));
        assert!(html.contains("Bank &amp; Co"));
        assert!(html.contains("Tajweed &quot;Advanced&quot;"));
        assert!(html.contains("CH-7-2"));
        assert!(html.contains("PKR 2334"));
        assert!(html.contains("2 of 3"));
    }
}
