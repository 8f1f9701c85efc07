//! Weekly class schedule.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::{class_session, course, notification, user, validate, NotificationKind, Role};

use crate::errors::ServiceError;
use crate::user_service::require_role;

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleInput {
    pub teacher_id: i32,
    pub student_id: i32,
    #[serde(default)]
    pub course_id: Option<i32>,
    pub weekday: i16,
    pub start_time: String,
    pub duration_minutes: i32,
    #[serde(default)]
    pub meeting_link: Option<String>,
}

/// A session with names resolved, as the admin sees it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub session: class_session::Model,
    pub weekday_name: &'static str,
    pub teacher_name: String,
    pub student_name: String,
    pub course_title: Option<String>,
}

/// A session from one participant's side.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleEntry {
    pub id: i32,
    pub weekday: i16,
    pub weekday_name: &'static str,
    pub start_time: String,
    pub duration_minutes: i32,
    pub meeting_link: Option<String>,
    pub course_title: Option<String>,
    pub counterpart_id: i32,
    pub counterpart_name: String,
    /// `teacher` or `student`: the viewer's part in this session.
    pub as_role: Role,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StudentSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

fn weekday_name(w: i16) -> &'static str {
    class_session::WEEKDAYS.get(w as usize).copied().unwrap_or("")
}

#[instrument(skip(db, input), fields(teacher_id = %input.teacher_id, student_id = %input.student_id))]
pub async fn create_session<C: ConnectionTrait>(db: &C, input: ScheduleInput) -> Result<class_session::Model, ServiceError> {
    let weekday = class_session::validate_weekday(input.weekday)?;
    let start_time = class_session::validate_start_time(&input.start_time)?;
    let duration = class_session::validate_duration(input.duration_minutes)?;
    let meeting_link = validate::optional_text("meeting_link", input.meeting_link.as_deref(), 512)?;
    let teacher = require_role(db, input.teacher_id, Role::Teacher, "teacher_id").await?;
    let student = require_role(db, input.student_id, Role::Student, "student_id").await?;
    let course_title = match input.course_id {
        Some(cid) => Some(
            course::Entity::find_by_id(cid)
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::validation(format!("course {cid} does not exist")))?
                .title,
        ),
        None => None,
    };

    let m = class_session::ActiveModel {
        course_id: Set(input.course_id),
        teacher_id: Set(teacher.id),
        student_id: Set(student.id),
        weekday: Set(weekday),
        start_time: Set(start_time),
        duration_minutes: Set(duration),
        meeting_link: Set(meeting_link),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let when = format!("{} at {} ({} min)", weekday_name(m.weekday), m.start_time, m.duration_minutes);
    let subject = course_title.map(|t| format!(" for {t}")).unwrap_or_default();
    notification::push(db, student.id, NotificationKind::Schedule, "Class scheduled", &format!("Class with {}{subject}: {when}", teacher.name)).await?;
    notification::push(db, teacher.id, NotificationKind::Schedule, "Class scheduled", &format!("Class with {}{subject}: {when}", student.name)).await?;
    info!(id = %m.id, weekday = m.weekday, start_time = %m.start_time, "scheduled class");
    Ok(m)
}

async fn lookups<C: ConnectionTrait>(
    db: &C,
    sessions: &[class_session::Model],
) -> Result<(HashMap<i32, user::Model>, HashMap<i32, String>), ServiceError> {
    let user_ids: Vec<i32> = sessions.iter().flat_map(|s| [s.teacher_id, s.student_id]).collect();
    let course_ids: Vec<i32> = sessions.iter().filter_map(|s| s.course_id).collect();
    let users = if user_ids.is_empty() {
        HashMap::new()
    } else {
        user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect()
    };
    let courses = if course_ids.is_empty() {
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
    Ok((users, courses))
}

fn ordered(q: sea_orm::Select<class_session::Entity>) -> sea_orm::Select<class_session::Entity> {
    q.order_by_asc(class_session::Column::Weekday)
        .order_by_asc(class_session::Column::StartTime)
        .order_by_asc(class_session::Column::Id)
}

pub async fn list_sessions<C: ConnectionTrait>(db: &C) -> Result<Vec<SessionView>, ServiceError> {
    let sessions = ordered(class_session::Entity::find()).all(db).await?;
    let (users, courses) = lookups(db, &sessions).await?;
    let name = |id: i32| users.get(&id).map(|u| u.name.clone()).unwrap_or_default();
    Ok(sessions
        .into_iter()
        .map(|s| SessionView {
            weekday_name: weekday_name(s.weekday),
            teacher_name: name(s.teacher_id),
            student_name: name(s.student_id),
            course_title: s.course_id.and_then(|c| courses.get(&c).cloned()),
            session: s,
        })
        .collect())
}

pub async fn delete_session<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, ServiceError> {
    let res = class_session::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

/// Sessions where `user_id` teaches or studies, by weekday then start time.
pub async fn my_schedule<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Vec<ScheduleEntry>, ServiceError> {
    let sessions = ordered(class_session::Entity::find().filter(
        Condition::any()
            .add(class_session::Column::TeacherId.eq(user_id))
            .add(class_session::Column::StudentId.eq(user_id)),
    ))
    .all(db)
    .await?;
    let (users, courses) = lookups(db, &sessions).await?;
    Ok(sessions
        .into_iter()
        .map(|s| {
            let (as_role, counterpart_id) = if s.teacher_id == user_id {
                (Role::Teacher, s.student_id)
            } else {
                (Role::Student, s.teacher_id)
            };
            ScheduleEntry {
                id: s.id,
                weekday: s.weekday,
                weekday_name: weekday_name(s.weekday),
                start_time: s.start_time,
                duration_minutes: s.duration_minutes,
                meeting_link: s.meeting_link,
                course_title: s.course_id.and_then(|c| courses.get(&c).cloned()),
                counterpart_id,
                counterpart_name: users.get(&counterpart_id).map(|u| u.name.clone()).unwrap_or_default(),
                as_role,
            }
        })
        .collect())
}

/// Distinct students a teacher has sessions with, by name.
pub async fn teacher_students<C: ConnectionTrait>(db: &C, teacher_id: i32) -> Result<Vec<StudentSummary>, ServiceError> {
    let sessions = class_session::Entity::find()
        .filter(class_session::Column::TeacherId.eq(teacher_id))
        .all(db)
        .await?;
    let ids: Vec<i32> = sessions.iter().map(|s| s.student_id).collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let students = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .order_by_asc(user::Column::Name)
        .all(db)
        .await?;
    Ok(students
        .into_iter()
        .map(|u| StudentSummary { id: u.id, name: u.name, email: u.email, phone: u.phone })
        .collect())
}
