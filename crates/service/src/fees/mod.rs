//! Fee plans, installments, payments, challans and the account book.

pub mod challan;
pub mod ledger;
pub mod plan;

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use sea_orm::sea_query::{Alias, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use configs::AcademyConfig;
use models::{
    course, fee_plan, installment, notification, payment, user, validate, InstallmentStatus, NotificationKind,
    PaymentMethod, PlanType, Role,
};

use crate::errors::ServiceError;
use crate::settings_service;
use crate::user_service::require_role;

use self::challan::{challan_number, Challan};
use self::ledger::AccountBook;
use self::plan::{progress, split_installments, FeeProgress};

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlanInput {
    pub student_id: i32,
    #[serde(default)]
    pub course_id: Option<i32>,
    pub total_amount: i64,
    pub plan_type: PlanType,
    #[serde(default)]
    pub installment_count: Option<i32>,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentInput {
    pub amount: i64,
    pub method: PaymentMethod,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub paid_at: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstallmentView {
    pub id: i32,
    pub fee_plan_id: i32,
    pub seq: i32,
    pub challan_no: String,
    pub amount: i64,
    pub paid_amount: i64,
    pub outstanding: i64,
    pub due_date: NaiveDate,
    /// Stored status, or `overdue` when unpaid past the due date.
    pub status: InstallmentStatus,
    pub paid_at: Option<DateTime<FixedOffset>>,
}

impl InstallmentView {
    pub fn from_model(m: installment::Model, today: NaiveDate) -> Self {
        let status = m.effective_status(today);
        Self {
            id: m.id,
            fee_plan_id: m.fee_plan_id,
            seq: m.seq,
            challan_no: challan_number(m.fee_plan_id, m.seq),
            outstanding: m.outstanding(),
            amount: m.amount,
            paid_amount: m.paid_amount,
            due_date: m.due_date,
            status,
            paid_at: m.paid_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanView {
    #[serde(flatten)]
    pub plan: fee_plan::Model,
    pub student_name: String,
    pub course_title: Option<String>,
    pub installments: Vec<InstallmentView>,
    pub progress: FeeProgress,
}

/// A student's plans plus a progress summary across all of them.
#[derive(Debug, Clone, Serialize)]
pub struct FeeOverview {
    pub plans: Vec<PlanView>,
    pub summary: FeeProgress,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub payment: payment::Model,
    pub installment: InstallmentView,
}

fn today() -> NaiveDate { Utc::now().date_naive() }

/// Create a plan and its installments in one transaction.
#[instrument(skip(db, input), fields(student_id = %input.student_id, total = input.total_amount))]
pub async fn create_plan(db: &DatabaseConnection, input: CreatePlanInput) -> Result<PlanView, ServiceError> {
    let planned = split_installments(input.total_amount, input.plan_type, input.installment_count, input.start_date)?;
    require_role(db, input.student_id, Role::Student, "student_id").await?;
    if let Some(cid) = input.course_id {
        if course::Entity::find_by_id(cid).one(db).await?.is_none() {
            return Err(ServiceError::validation(format!("course {cid} does not exist")));
        }
    }

    let txn = db.begin().await?;
    let now: DateTime<FixedOffset> = Utc::now().into();
    let plan = fee_plan::ActiveModel {
        student_id: Set(input.student_id),
        course_id: Set(input.course_id),
        total_amount: Set(input.total_amount),
        plan_type: Set(input.plan_type.into()),
        installment_count: Set(planned.len() as i32),
        start_date: Set(input.start_date),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    for p in &planned {
        installment::ActiveModel {
            fee_plan_id: Set(plan.id),
            seq: Set(p.seq),
            amount: Set(p.amount),
            paid_amount: Set(0),
            due_date: Set(p.due_date),
            status: Set(InstallmentStatus::Pending.into()),
            paid_at: Set(None),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }
    notification::push(
        &txn,
        input.student_id,
        NotificationKind::Fee,
        "New fee plan",
        &format!("A fee plan of {} in {} installment(s) has been created for you.", plan.total_amount, planned.len()),
    )
    .await?;
    txn.commit().await?;
    info!(id = %plan.id, installments = planned.len(), "created fee plan");

    let mut views = load_plan_views(db, vec![plan], today()).await?;
    views.pop().ok_or_else(|| ServiceError::Internal("created plan vanished".into()))
}

async fn load_plan_views<C: ConnectionTrait>(db: &C, plans: Vec<fee_plan::Model>, today: NaiveDate) -> Result<Vec<PlanView>, ServiceError> {
    let plan_ids: Vec<i32> = plans.iter().map(|p| p.id).collect();
    let mut by_plan: HashMap<i32, Vec<installment::Model>> = HashMap::new();
    if !plan_ids.is_empty() {
        let rows = installment::Entity::find()
            .filter(installment::Column::FeePlanId.is_in(plan_ids))
            .order_by_asc(installment::Column::Seq)
            .all(db)
            .await?;
        for r in rows {
            by_plan.entry(r.fee_plan_id).or_default().push(r);
        }
    }
    let course_ids: Vec<i32> = plans.iter().filter_map(|p| p.course_id).collect();
    let courses: HashMap<i32, String> = if course_ids.is_empty() {
        HashMap::new()
    } else {
        course::Entity::find()
            .filter(course::Column::Id.is_in(course_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.title))
            .collect()
    };
    let student_ids: Vec<i32> = plans.iter().map(|p| p.student_id).collect();
    let students: HashMap<i32, String> = if student_ids.is_empty() {
        HashMap::new()
    } else {
        user::Entity::find()
            .filter(user::Column::Id.is_in(student_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect()
    };

    Ok(plans
        .into_iter()
        .map(|p| {
            let rows = by_plan.remove(&p.id).unwrap_or_default();
            let paid: i64 = rows.iter().map(|i| i.paid_amount).sum();
            let installments = rows.into_iter().map(|i| InstallmentView::from_model(i, today)).collect();
            PlanView {
                student_name: students.get(&p.student_id).cloned().unwrap_or_default(),
                course_title: p.course_id.and_then(|c| courses.get(&c).cloned()),
                progress: progress(p.total_amount, paid),
                installments,
                plan: p,
            }
        })
        .collect())
}

/// Plans newest first, optionally for one student.
pub async fn list_plans<C: ConnectionTrait>(db: &C, student_id: Option<i32>) -> Result<Vec<PlanView>, ServiceError> {
    let mut q = fee_plan::Entity::find();
    if let Some(sid) = student_id {
        q = q.filter(fee_plan::Column::StudentId.eq(sid));
    }
    let plans = q.order_by_desc(fee_plan::Column::Id).all(db).await?;
    load_plan_views(db, plans, today()).await
}

pub async fn student_overview<C: ConnectionTrait>(db: &C, student_id: i32) -> Result<FeeOverview, ServiceError> {
    let plans = list_plans(db, Some(student_id)).await?;
    let total = plans.iter().map(|p| p.plan.total_amount).sum();
    let paid = plans.iter().map(|p| p.progress.paid).sum();
    Ok(FeeOverview { summary: progress(total, paid), plans })
}

/// Deletes the plan; installments and payments cascade.
pub async fn delete_plan<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, ServiceError> {
    let res = fee_plan::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected > 0 {
        info!(id = %id, "deleted fee plan");
    }
    Ok(res.rows_affected > 0)
}

async fn installment_with_plan<C: ConnectionTrait>(db: &C, id: i32) -> Result<(installment::Model, fee_plan::Model), ServiceError> {
    let inst = installment::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("installment"))?;
    let plan = fee_plan::Entity::find_by_id(inst.fee_plan_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("fee plan"))?;
    Ok((inst, plan))
}

/// Record a payment against one installment. The payment insert, the
/// installment update and the student notification share a transaction.
#[instrument(skip(db, input), fields(amount = input.amount, method = %input.method))]
pub async fn record_payment(
    db: &DatabaseConnection,
    installment_id: i32,
    recorded_by: Option<i32>,
    input: PaymentInput,
) -> Result<PaymentReceipt, ServiceError> {
    if input.amount <= 0 {
        return Err(ServiceError::validation("amount must be > 0"));
    }
    let txn = db.begin().await?;
    match apply_payment(&txn, installment_id, recorded_by, input).await {
        Ok(receipt) => {
            txn.commit().await?;
            info!(payment_id = %receipt.payment.id, installment_id = %receipt.installment.id, status = %receipt.installment.status, "payment recorded");
            Ok(receipt)
        }
        Err(e) => {
            txn.rollback().await?;
            Err(e)
        }
    }
}

async fn apply_payment<C: ConnectionTrait>(
    txn: &C,
    installment_id: i32,
    recorded_by: Option<i32>,
    input: PaymentInput,
) -> Result<PaymentReceipt, ServiceError> {
    let reference = validate::optional_text("reference", input.reference.as_deref(), 128)?;
    let (inst, plan) = installment_with_plan(txn, installment_id).await?;
    let outstanding = inst.outstanding();
    if input.amount > outstanding {
        return Err(ServiceError::validation(format!(
            "amount {} exceeds outstanding {} on installment {}",
            input.amount, outstanding, inst.seq
        )));
    }
    let paid_at = input.paid_at.unwrap_or_else(|| Utc::now().into());
    let pay = payment::ActiveModel {
        installment_id: Set(inst.id),
        amount: Set(input.amount),
        method: Set(input.method.into()),
        reference: Set(reference),
        paid_at: Set(paid_at),
        recorded_by: Set(recorded_by),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    let seq = inst.seq;
    let settles = Expr::expr(Expr::col(installment::Column::PaidAmount).add(input.amount))
        .gte(Expr::col(installment::Column::Amount));
    let res = installment::Entity::update_many()
        .col_expr(installment::Column::PaidAmount, Expr::col(installment::Column::PaidAmount).add(input.amount))
        .col_expr(
            installment::Column::Status,
            Expr::case(settles.clone(), InstallmentStatus::Paid.as_str())
                .finally(InstallmentStatus::Partial.as_str())
                .into(),
        )
        .col_expr(
            installment::Column::PaidAt,
            Expr::case(settles, Expr::val(paid_at)).finally(Expr::col(installment::Column::PaidAt)).into(),
        )
        .filter(installment::Column::Id.eq(inst.id))
        .filter(
            Expr::expr(Expr::col(installment::Column::Amount).sub(Expr::col(installment::Column::PaidAmount)))
                .gte(input.amount),
        )
        .exec(txn)
        .await?;
    // A concurrent payment got there first and the remaining balance shrank.
    if res.rows_affected == 0 {
        return Err(ServiceError::validation(format!("amount {} exceeds outstanding on installment {seq}", input.amount)));
    }
    let updated = installment::Entity::find_by_id(inst.id)
        .one(txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("installment"))?;

    notification::push(
        txn,
        plan.student_id,
        NotificationKind::Fee,
        "Payment received",
        &format!("Payment of {} received for installment {} ({}).", input.amount, seq, challan_number(plan.id, seq)),
    )
    .await?;
    Ok(PaymentReceipt { payment: pay, installment: InstallmentView::from_model(updated, today()) })
}

/// Build the challan for an installment. Students may only open their own.
pub async fn challan_for<C: ConnectionTrait>(
    db: &C,
    installment_id: i32,
    viewer_id: i32,
    viewer_is_admin: bool,
    academy: &AcademyConfig,
) -> Result<Challan, ServiceError> {
    let (inst, plan) = installment_with_plan(db, installment_id).await?;
    if !viewer_is_admin && plan.student_id != viewer_id {
        return Err(ServiceError::Forbidden("not your installment".into()));
    }
    let student = user::Entity::find_by_id(plan.student_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("student"))?;
    let course_title = match plan.course_id {
        Some(cid) => course::Entity::find_by_id(cid).one(db).await?.map(|c| c.title),
        None => None,
    };
    let profile = settings_service::academy_profile(db, academy).await?;
    Ok(Challan {
        academy: profile,
        challan_no: challan_number(plan.id, inst.seq),
        student_name: student.name,
        student_email: student.email,
        course_title,
        seq: inst.seq,
        installment_count: plan.installment_count,
        due_date: inst.due_date,
        amount: inst.amount,
        paid_amount: inst.paid_amount,
        outstanding: inst.outstanding(),
        status: inst.effective_status(today()).to_string(),
    })
}

/// Chronological debit/credit listing for one student.
pub async fn account_book<C: ConnectionTrait>(db: &C, student_id: i32) -> Result<AccountBook, ServiceError> {
    let plans = fee_plan::Entity::find()
        .filter(fee_plan::Column::StudentId.eq(student_id))
        .all(db)
        .await?;
    let plan_ids: Vec<i32> = plans.iter().map(|p| p.id).collect();
    if plan_ids.is_empty() {
        return Ok(ledger::build(Vec::new()));
    }
    let counts: HashMap<i32, i32> = plans.iter().map(|p| (p.id, p.installment_count)).collect();
    let insts = installment::Entity::find()
        .filter(installment::Column::FeePlanId.is_in(plan_ids))
        .order_by_asc(installment::Column::Id)
        .all(db)
        .await?;
    let inst_ids: Vec<i32> = insts.iter().map(|i| i.id).collect();
    let pays = payment::Entity::find()
        .filter(payment::Column::InstallmentId.is_in(inst_ids))
        .order_by_asc(payment::Column::PaidAt)
        .order_by_asc(payment::Column::Id)
        .all(db)
        .await?;

    let mut entries = Vec::with_capacity(insts.len() + pays.len());
    let mut challans = HashMap::new();
    for i in &insts {
        let no = challan_number(i.fee_plan_id, i.seq);
        let of = counts.get(&i.fee_plan_id).copied().unwrap_or(i.seq);
        entries.push(ledger::debit(i.due_date, format!("Installment {}/{} ({no})", i.seq, of), i.amount));
        challans.insert(i.id, no);
    }
    for p in pays {
        let no = challans.get(&p.installment_id).cloned().unwrap_or_default();
        let mut desc = format!("Payment ({}) for {no}", p.method);
        if let Some(r) = &p.reference {
            desc.push_str(&format!(", ref {r}"));
        }
        entries.push(ledger::credit(p.paid_at.naive_utc().date(), desc, p.amount));
    }
    Ok(ledger::build(entries))
}

/// Sums across all plans: (billed, collected).
pub async fn totals<C: ConnectionTrait>(db: &C) -> Result<(i64, i64), ServiceError> {
    let billed = column_sum(fee_plan::Entity::find(), fee_plan::Column::TotalAmount, db).await?;
    let collected = column_sum(installment::Entity::find(), installment::Column::PaidAmount, db).await?;
    Ok((billed, collected))
}

/// `SUM(col)` cast to BIGINT; Postgres widens bigint sums to numeric.
async fn column_sum<E, C>(select: Select<E>, col: E::Column, db: &C) -> Result<i64, ServiceError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let sum: Option<Option<i64>> = select
        .select_only()
        .column_as(Expr::col(col).sum().cast_as(Alias::new("BIGINT")), "total")
        .into_tuple()
        .one(db)
        .await?;
    Ok(sum.flatten().unwrap_or_default())
}
