//! In-memory repositories and fixtures shared by the service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::certifications::{
    record_check_in, Certification, CertificationRepositoryTrait, CheckInOutcome, FeedItem,
    NewCertification,
};
use crate::challenges::{ChallengeEnrollment, ChallengeRepositoryTrait};
use crate::errors::{DatabaseError, Error, Result};
use crate::goals::{Goal, GoalRepositoryTrait, GoalUpdate};
use crate::groups::{Group, GroupRepositoryTrait};
use crate::photos::{validate_upload, PhotoStoreTrait, PhotoUpload, StoredPhoto};
use crate::users::{AccountDeletion, User, UserChange, UserRepositoryTrait};
use crate::utils::time_utils::YearMonth;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// UTC instant at the top of `hour`.
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

fn epoch() -> NaiveDateTime {
    date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap()
}

/// A "Workout" goal whose first `progress` calendar days are checked.
pub fn sample_goal(
    id: &str,
    user_id: &str,
    progress: i32,
    weekly_goal: i32,
    last_reset_date: NaiveDate,
) -> Goal {
    let mut completed_days = [false; 7];
    for day in completed_days.iter_mut().take(progress.max(0) as usize) {
        *day = true;
    }
    Goal {
        id: id.to_string(),
        user_id: user_id.to_string(),
        icon: "🏋".to_string(),
        color: "#FF7043".to_string(),
        name: "Workout".to_string(),
        weekly_goal,
        progress,
        completed_days,
        last_reset_date,
        weekly_history: Vec::new(),
        created_at: epoch(),
        updated_at: epoch(),
    }
}

pub fn sample_user(id: &str, group_id: Option<&str>) -> User {
    User {
        id: id.to_string(),
        display_name: id.to_uppercase(),
        email: None,
        photo_url: None,
        group_id: group_id.map(str::to_string),
        created_at: epoch(),
        updated_at: epoch(),
    }
}

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    groups: HashMap<String, Group>,
    goals: HashMap<String, Goal>,
    certifications: Vec<Certification>,
    enrollments: Vec<ChallengeEnrollment>,
}

/// Implements every repository trait over plain collections.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    fail_check_ins: AtomicBool,
    photo_urls_on_delete: Mutex<Vec<String>>,
}

impl InMemoryStore {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn put_goal(&self, goal: Goal) {
        self.tables().goals.insert(goal.id.clone(), goal);
    }

    pub fn goal(&self, id: &str) -> Option<Goal> {
        self.tables().goals.get(id).cloned()
    }

    pub fn put_user(&self, user: User) {
        self.tables().users.insert(user.id.clone(), user);
    }

    pub fn user(&self, id: &str) -> Option<User> {
        self.tables().users.get(id).cloned()
    }

    pub fn user_count(&self) -> usize {
        self.tables().users.len()
    }

    pub fn certification_count(&self) -> usize {
        self.tables().certifications.len()
    }

    /// Makes `insert_with_check_in` fail as a broken transaction would.
    pub fn fail_check_ins(&self, fail: bool) {
        self.fail_check_ins.store(fail, Ordering::SeqCst);
    }

    /// Photo references reported by the next `delete_user_cascade`.
    pub fn set_photo_urls_on_delete(&self, urls: Vec<String>) {
        *self.photo_urls_on_delete.lock().unwrap() = urls;
    }
}

#[async_trait]
impl GoalRepositoryTrait for InMemoryStore {
    fn find_goal(&self, goal_id: &str) -> Result<Option<Goal>> {
        Ok(self.goal(goal_id))
    }

    fn load_goals_for_user(&self, user_id: &str) -> Result<Vec<Goal>> {
        self.load_goals_for_users(&[user_id.to_string()])
    }

    fn load_goals_for_users(&self, user_ids: &[String]) -> Result<Vec<Goal>> {
        let mut goals: Vec<Goal> = self
            .tables()
            .goals
            .values()
            .filter(|goal| user_ids.contains(&goal.user_id))
            .cloned()
            .collect();
        goals.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(goals)
    }

    async fn insert_new_goal(&self, goal: Goal) -> Result<Goal> {
        self.put_goal(goal.clone());
        Ok(goal)
    }

    async fn apply_goal_update(
        &self,
        goal_id: String,
        update: GoalUpdate,
        today: NaiveDate,
        updated_at: NaiveDateTime,
    ) -> Result<Goal> {
        let mut tables = self.tables();
        let stored = tables
            .goals
            .get(&goal_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Goal {}", goal_id)))?;
        let goal = update.apply_to(stored, today, updated_at);
        tables.goals.insert(goal_id, goal.clone());
        Ok(goal)
    }

    async fn delete_goal(&self, goal_id: String) -> Result<usize> {
        let mut tables = self.tables();
        tables.certifications.retain(|c| c.goal_id != goal_id);
        Ok(tables.goals.remove(&goal_id).map_or(0, |_| 1))
    }
}

#[async_trait]
impl UserRepositoryTrait for InMemoryStore {
    fn find_user(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self.user(user_id))
    }

    fn load_users(&self, user_ids: &[String]) -> Result<Vec<User>> {
        let tables = self.tables();
        Ok(user_ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }

    fn load_group_members(&self, group_id: &str) -> Result<Vec<User>> {
        let mut members: Vec<User> = self
            .tables()
            .users
            .values()
            .filter(|user| user.group_id.as_deref() == Some(group_id))
            .cloned()
            .collect();
        members.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(members)
    }

    async fn insert_user(&self, user: User) -> Result<User> {
        let mut tables = self.tables();
        if tables.users.contains_key(&user.id) {
            return Err(Error::Database(DatabaseError::UniqueViolation(user.id)));
        }
        tables.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn apply_user_change(
        &self,
        user_id: String,
        change: UserChange,
        updated_at: NaiveDateTime,
    ) -> Result<User> {
        let mut tables = self.tables();
        let stored = tables
            .users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))?;
        let user = change.apply_to(stored, updated_at);
        tables.users.insert(user_id, user.clone());
        Ok(user)
    }

    async fn delete_user_cascade(&self, user_id: String) -> Result<AccountDeletion> {
        let mut tables = self.tables();
        let certifications_before = tables.certifications.len();
        tables.certifications.retain(|c| c.user_id != user_id);
        let goals_before = tables.goals.len();
        tables.goals.retain(|_, goal| goal.user_id != user_id);
        let enrollments_before = tables.enrollments.len();
        tables.enrollments.retain(|e| e.user_id != user_id);
        tables.users.remove(&user_id);

        Ok(AccountDeletion {
            goals_deleted: goals_before - tables.goals.len(),
            certifications_deleted: certifications_before - tables.certifications.len(),
            enrollments_deleted: enrollments_before - tables.enrollments.len(),
            photo_urls: self.photo_urls_on_delete.lock().unwrap().clone(),
            user_id,
        })
    }
}

#[async_trait]
impl GroupRepositoryTrait for InMemoryStore {
    fn find_group(&self, group_id: &str) -> Result<Option<Group>> {
        Ok(self.tables().groups.get(group_id).cloned())
    }

    async fn insert_group_with_owner(&self, group: Group) -> Result<Group> {
        let mut tables = self.tables();
        let owner = tables
            .users
            .get_mut(&group.owner_id)
            .ok_or_else(|| Error::NotFound(format!("User {}", group.owner_id)))?;
        owner.group_id = Some(group.id.clone());
        tables.groups.insert(group.id.clone(), group.clone());
        Ok(group)
    }
}

#[async_trait]
impl CertificationRepositoryTrait for InMemoryStore {
    fn load_feed(
        &self,
        user_ids: &[String],
        before: Option<NaiveDateTime>,
        before_id: Option<&str>,
        limit: i64,
    ) -> Result<Vec<FeedItem>> {
        let tables = self.tables();
        let mut certifications: Vec<&Certification> = tables
            .certifications
            .iter()
            .filter(|c| user_ids.contains(&c.user_id))
            .filter(|c| match (before, before_id) {
                (None, _) => true,
                (Some(before), None) => c.created_at < before,
                (Some(before), Some(before_id)) => {
                    (c.created_at, c.id.as_str()) < (before, before_id)
                }
            })
            .collect();
        certifications.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(certifications
            .into_iter()
            .take(limit as usize)
            .filter_map(|c| {
                let author = tables.users.get(&c.user_id)?;
                let goal = tables.goals.get(&c.goal_id)?;
                Some(FeedItem {
                    certification: c.clone(),
                    author_name: author.display_name.clone(),
                    author_photo_url: author.photo_url.clone(),
                    goal_name: goal.name.clone(),
                    goal_icon: goal.icon.clone(),
                    goal_color: goal.color.clone(),
                })
            })
            .collect())
    }

    fn load_goal_certifications(&self, goal_id: &str) -> Result<Vec<Certification>> {
        let mut certifications: Vec<Certification> = self
            .tables()
            .certifications
            .iter()
            .filter(|c| c.goal_id == goal_id)
            .cloned()
            .collect();
        certifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(certifications)
    }

    async fn insert_with_check_in(
        &self,
        new_certification: NewCertification,
        today: NaiveDate,
    ) -> Result<CheckInOutcome> {
        if self.fail_check_ins.load(Ordering::SeqCst) {
            return Err(Error::Database(DatabaseError::TransactionFailed(
                "simulated failure".to_string(),
            )));
        }
        let mut tables = self.tables();
        let goal = tables
            .goals
            .get(&new_certification.goal_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Goal {}", new_certification.goal_id)))?;

        let mut goal = record_check_in(goal, today);
        goal.updated_at = new_certification.created_at;
        let certification = Certification {
            id: new_certification.id,
            user_id: new_certification.user_id,
            goal_id: new_certification.goal_id,
            photo_url: new_certification.photo_url,
            progress_snapshot: goal.completion_percent(),
            created_at: new_certification.created_at,
        };
        tables.goals.insert(goal.id.clone(), goal.clone());
        tables.certifications.push(certification.clone());
        Ok(CheckInOutcome {
            goal,
            certification,
        })
    }
}

#[async_trait]
impl ChallengeRepositoryTrait for InMemoryStore {
    fn load_enrollments(
        &self,
        group_id: &str,
        month: YearMonth,
    ) -> Result<Vec<ChallengeEnrollment>> {
        Ok(self
            .tables()
            .enrollments
            .iter()
            .filter(|e| e.group_id == group_id && e.year == month.year && e.month == month.month)
            .cloned()
            .collect())
    }

    fn find_enrollment(
        &self,
        user_id: &str,
        month: YearMonth,
    ) -> Result<Option<ChallengeEnrollment>> {
        Ok(self
            .tables()
            .enrollments
            .iter()
            .find(|e| e.user_id == user_id && e.year == month.year && e.month == month.month)
            .cloned())
    }

    async fn insert_enrollment(
        &self,
        enrollment: ChallengeEnrollment,
    ) -> Result<ChallengeEnrollment> {
        self.tables().enrollments.push(enrollment.clone());
        Ok(enrollment)
    }

    async fn delete_enrollment(&self, user_id: String, month: YearMonth) -> Result<usize> {
        let mut tables = self.tables();
        let before = tables.enrollments.len();
        tables.enrollments.retain(|e| {
            !(e.user_id == user_id && e.year == month.year && e.month == month.month)
        });
        Ok(before - tables.enrollments.len())
    }
}

/// Photo store keeping uploaded URLs in memory.
#[derive(Default)]
pub struct InMemoryPhotoStore {
    urls: Mutex<Vec<String>>,
    fail_uploads: AtomicBool,
}

impl InMemoryPhotoStore {
    pub fn seed(&self, url: &str) {
        self.urls.lock().unwrap().push(url.to_string());
    }

    pub fn count(&self) -> usize {
        self.urls.lock().unwrap().len()
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl PhotoStoreTrait for InMemoryPhotoStore {
    async fn put(&self, owner_id: &str, upload: PhotoUpload) -> Result<StoredPhoto> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(Error::PhotoStorage("upload rejected".to_string()));
        }
        let kind = validate_upload(&upload, usize::MAX)?;
        let mut urls = self.urls.lock().unwrap();
        let key = format!("{}/{}.{}", owner_id, urls.len(), kind.extension());
        let url = format!("mem://{}", key);
        urls.push(url.clone());
        Ok(StoredPhoto { key, url })
    }

    async fn delete(&self, url: &str) -> Result<()> {
        self.urls.lock().unwrap().retain(|stored| stored != url);
        Ok(())
    }
}
