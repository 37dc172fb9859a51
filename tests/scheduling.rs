use chrono::Weekday;
use rstest::rstest;

use u_timetable::models::{
    hm, Classroom, IssueKind, RoomType, Subject, SubjectPriority, SubjectType, Teacher, TimeSlot,
};
use u_timetable::scheduler::{Scheduler, SchedulingConstraints};
use u_timetable::validation::{validate_input, ValidationErrorKind};
use u_timetable::{Timetable, WeekSettings};

fn scheduler(seed: u64) -> Scheduler {
    Scheduler::new(SchedulingConstraints::default())
        .unwrap()
        .with_seed(seed)
}

fn department() -> Timetable {
    let mut tt = Timetable::new("Science").with_term("2026-2027", "Fall");
    tt.add_subject(
        Subject::new("MATH101", "Calculus", 60)
            .with_sessions_per_week(3)
            .with_priority(SubjectPriority::High),
    )
    .unwrap();
    tt.add_subject(Subject::new("PHYS101", "Physics", 60).with_sessions_per_week(2))
        .unwrap();
    tt.add_subject(
        Subject::new("CHEM101", "Chemistry Lab", 60)
            .with_type(SubjectType::Lab)
            .with_lab()
            .with_sessions_per_week(2),
    )
    .unwrap();
    tt.add_subject(
        Subject::new("CS101", "Programming", 60)
            .with_computers()
            .with_max_students(25)
            .with_sessions_per_week(2),
    )
    .unwrap();
    tt.add_subject(
        Subject::new("HIST100", "History", 60)
            .with_priority(SubjectPriority::Low)
            .with_projector(),
    )
    .unwrap();

    tt.add_teacher(
        Teacher::new("T1", "Ada")
            .with_subject("MATH101")
            .with_subject("CS101"),
    )
    .unwrap();
    tt.add_teacher(
        Teacher::new("T2", "Bob")
            .with_subject("PHYS101")
            .with_subject("CHEM101")
            .with_unavailable(TimeSlot::from_hm(Weekday::Mon, (9, 0), (12, 0)).unwrap()),
    )
    .unwrap();
    tt.add_teacher(
        Teacher::new("T3", "Cy")
            .with_subject("HIST100")
            .with_subject("MATH101"),
    )
    .unwrap();

    tt.add_classroom(Classroom::new("A101", "Room A101", 40).with_projector())
        .unwrap();
    tt.add_classroom(Classroom::new("LAB1", "Chem Lab", 24).with_type(RoomType::Laboratory))
        .unwrap();
    tt.add_classroom(
        Classroom::new("PC1", "PC Room", 30)
            .with_type(RoomType::ComputerLab)
            .with_computers(30),
    )
    .unwrap();
    tt
}

#[test]
fn two_sessions_are_placed_on_distinct_slots() {
    let mut tt = Timetable::new("Single");
    tt.add_subject(Subject::new("CS101", "Programming", 60).with_sessions_per_week(2))
        .unwrap();
    tt.add_teacher(Teacher::new("T1", "Ada").with_subject("CS101"))
        .unwrap();
    tt.add_classroom(Classroom::new("R1", "Room", 30)).unwrap();

    let mut s = Scheduler::new(SchedulingConstraints::default().with_max_attempts(50))
        .unwrap()
        .with_seed(11);
    s.generate(&mut tt, false).unwrap();

    let entries = tt.schedule().entries();
    assert_eq!(entries.len(), 2);
    assert_ne!(entries[0].time_slot, entries[1].time_slot);
    assert!(!entries[0].time_slot.overlaps(&entries[1].time_slot));

    let report = s.report(&tt);
    assert!((report.success_rate - 100.0).abs() < 1e-10);
    assert!(report.issues.is_empty());
}

#[test]
fn lab_subject_without_laboratory_is_reported_short() {
    let mut tt = Timetable::new("No lab");
    tt.add_subject(Subject::new("CHEM", "Chemistry", 60).with_lab())
        .unwrap();
    tt.add_teacher(Teacher::new("T1", "Ada").with_subject("CHEM"))
        .unwrap();
    tt.add_classroom(Classroom::new("R1", "Room", 30)).unwrap();

    let mut s = scheduler(3);
    let outcome = s.generate(&mut tt, true).unwrap();
    assert_eq!(outcome.placed, 0);
    assert_eq!(outcome.shortfalls.len(), 1);

    let report = s.report(&tt);
    assert!(!report.schedule_generated);
    assert!((report.success_rate - 0.0).abs() < 1e-10);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(
        report.issues[0],
        "Subject Chemistry (CHEM) has 0.0h scheduled but requires 1.0h per week"
    );
    assert!(report.statistics.total_teaching_hours.is_sign_positive());
}

#[test]
fn weekly_hour_cap_is_flagged_not_enforced() {
    let mut tt = Timetable::new("Overload");
    tt.add_subject(Subject::new("LAB1", "Workshop", 90).with_sessions_per_week(2))
        .unwrap();
    tt.add_teacher(
        Teacher::new("T1", "Ada")
            .with_subject("LAB1")
            .with_hour_limits(2, 2, 2),
    )
    .unwrap();
    tt.add_classroom(Classroom::new("R1", "Room", 30)).unwrap();

    let mut s = scheduler(5);
    let outcome = s.generate(&mut tt, false).unwrap();
    assert_eq!(outcome.placed, 2);
    assert!(outcome.is_complete());

    let issues = tt.schedule().issues(tt.registry());
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::TeacherOverload);
    assert!(issues[0].message.contains("3.0h but max is 2h"));
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(42)]
#[case(2026)]
fn generated_schedule_is_conflict_free(#[case] seed: u64) {
    let mut tt = department();
    let mut s = scheduler(seed);
    s.generate(&mut tt, true).unwrap();

    let entries = tt.schedule().entries();
    for (i, a) in entries.iter().enumerate() {
        for b in &entries[i + 1..] {
            assert!(!a.conflicts_with(b), "{a} conflicts with {b}");
        }
    }
    assert!(tt
        .schedule()
        .issues(tt.registry())
        .iter()
        .all(|i| i.kind != IssueKind::Conflict));

    let registry = tt.registry();
    for e in entries {
        let subject = registry.subject(&e.subject_code).unwrap();
        let teacher = registry.teacher(&e.teacher_id).unwrap();
        let room = registry.classroom(&e.room_number).unwrap();
        assert!(teacher.can_teach(&subject.code));
        assert!(teacher.is_available_at(&e.time_slot));
        assert!(room.is_available_at(&e.time_slot));
        assert!(room.meets_requirements(subject));
    }

    let report = s.report(&tt);
    assert!((0.0..=100.0).contains(&report.success_rate));
    assert_eq!(report.statistics.schedule_conflicts, 0);
}

#[test]
fn department_is_fully_scheduled() {
    let mut tt = department();
    assert!(validate_input(tt.registry()).is_ok());

    let mut s = scheduler(9);
    let outcome = s.generate(&mut tt, false).unwrap();
    assert_eq!(outcome.required, 10);
    assert_eq!(outcome.placed, 10);

    let registry = tt.registry();
    let schedule = tt.schedule();
    assert!(schedule
        .entries_for_subject("CHEM101")
        .iter()
        .all(|e| e.room_number == "LAB1"));
    assert!(schedule
        .entries_for_subject("CS101")
        .iter()
        .all(|e| e.room_number == "PC1"));
    assert!(schedule
        .entries_for_teacher("T2")
        .iter()
        .all(|e| !(e.time_slot.day() == Weekday::Mon && e.time_slot.starts_before_noon())));
    // MATH101 alternates T1, T3, T1 by load; CS101 and HIST100 have one teacher each
    assert!((schedule.teacher_weekly_hours(registry, "T1") - 4.0).abs() < 1e-10);
    assert!((schedule.teacher_weekly_hours(registry, "T2") - 4.0).abs() < 1e-10);
    assert!((schedule.teacher_weekly_hours(registry, "T3") - 2.0).abs() < 1e-10);
}

#[test]
fn input_validation_explains_missing_rooms() {
    let mut tt = department();
    tt.remove_classroom("LAB1").unwrap();

    let errors = validate_input(tt.registry()).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ValidationErrorKind::NoSuitableClassroom);
    assert!(errors[0].message.contains("CHEM101"));

    let outcome = scheduler(2).generate(&mut tt, false).unwrap();
    assert_eq!(outcome.shortfalls.len(), 1);
    assert_eq!(outcome.shortfalls[0].subject_code, "CHEM101");
}

#[test]
fn same_seed_gives_same_schedule() {
    let base = department();
    let placements = |seed: u64| {
        let mut tt = base.clone();
        scheduler(seed).generate(&mut tt, true).unwrap();
        tt.schedule()
            .entries()
            .iter()
            .map(|e| {
                (
                    e.time_slot,
                    e.subject_code.clone(),
                    e.teacher_id.clone(),
                    e.room_number.clone(),
                )
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(placements(99), placements(99));
    assert!(base.schedule().is_empty());
}

#[rstest]
#[case(SubjectPriority::Critical, SubjectPriority::Low, "FIRST")]
#[case(SubjectPriority::Low, SubjectPriority::High, "SECOND")]
#[case(SubjectPriority::Medium, SubjectPriority::Medium, "FIRST")]
fn scarce_slot_goes_to_higher_priority(
    #[case] first: SubjectPriority,
    #[case] second: SubjectPriority,
    #[case] winner: &str,
) {
    let week = WeekSettings::default()
        .with_working_days([Weekday::Mon])
        .with_hours(hm(9, 0).unwrap(), hm(10, 0).unwrap());
    let mut tt = Timetable::new("Scarce").with_week(week);
    tt.add_subject(Subject::new("FIRST", "First subject", 60).with_priority(first))
        .unwrap();
    tt.add_subject(Subject::new("SECOND", "Second subject", 60).with_priority(second))
        .unwrap();
    tt.add_teacher(
        Teacher::new("T1", "Ada")
            .with_subject("FIRST")
            .with_subject("SECOND"),
    )
    .unwrap();
    tt.add_classroom(Classroom::new("R1", "Room", 30)).unwrap();

    let mut s = scheduler(0);
    let outcome = s.generate(&mut tt, false).unwrap();
    assert_eq!(outcome.placed, 1);
    assert_eq!(tt.schedule().entries()[0].subject_code, winner);
    assert!((s.report(&tt).success_rate - 50.0).abs() < 1e-10);
}

#[test]
fn removing_entities_cascades_to_entries() {
    let mut tt = department();
    scheduler(4).generate(&mut tt, false).unwrap();
    let before = tt.schedule().len();
    let t1_entries = tt.schedule().entries_for_teacher("T1").len();
    assert!(t1_entries > 0);

    tt.remove_teacher("T1").unwrap();
    assert_eq!(tt.schedule().len(), before - t1_entries);
    assert!(tt.schedule().entries_for_teacher("T1").is_empty());

    tt.remove_classroom("LAB1").unwrap();
    assert!(tt.schedule().entries_for_subject("CHEM101").is_empty());

    tt.remove_subject("PHYS101").unwrap();
    assert!(tt.schedule().entries_for_subject("PHYS101").is_empty());
    assert!(tt.validate().iter().all(|m| !m.starts_with("Conflict")));
}

#[test]
fn lower_case_records_from_json_are_scheduled() {
    let subject: Subject = serde_json::from_value(serde_json::json!({
        "code": "cs101",
        "name": "Programming",
        "subject_type": "lecture",
        "priority": "medium",
        "duration_minutes": 60,
        "sessions_per_week": 2,
        "requires_lab": false,
        "requires_projector": false,
        "requires_computer": false,
        "prerequisites": []
    }))
    .unwrap();
    let mut teacher = serde_json::to_value(Teacher::new("T1", "Ada")).unwrap();
    teacher["employee_id"] = "t1".into();
    teacher["subjects_qualified"] = serde_json::json!(["cs101"]);
    let teacher: Teacher = serde_json::from_value(teacher).unwrap();
    let mut room = serde_json::to_value(Classroom::new("R1", "Room", 30)).unwrap();
    room["room_number"] = "r1".into();
    let room: Classroom = serde_json::from_value(room).unwrap();

    let mut tt = Timetable::new("Imported");
    tt.add_subject(subject).unwrap();
    tt.add_teacher(teacher).unwrap();
    tt.add_classroom(room).unwrap();
    assert!(tt.registry().subject("cs101").is_some());

    let mut s = Scheduler::new(SchedulingConstraints::default().with_max_attempts(50))
        .unwrap()
        .with_seed(5);
    let outcome = s.generate(&mut tt, false).unwrap();
    assert_eq!(outcome.placed, 2);
    assert!(outcome.is_complete());
    assert!(tt
        .schedule()
        .entries()
        .iter()
        .all(|e| e.subject_code == "CS101" && e.teacher_id == "T1" && e.room_number == "R1"));

    tt.remove_teacher("t1").unwrap();
    assert!(tt.schedule().is_empty());
}

#[test]
fn optimization_keeps_every_entry() {
    let mut plain = department();
    let mut optimized = plain.clone();
    let a = scheduler(8).generate(&mut plain, false).unwrap();
    let b = scheduler(8).generate(&mut optimized, true).unwrap();

    assert_eq!(a.placed, b.placed);
    assert_eq!(optimized.schedule().len(), b.placed);
    assert!(optimized
        .schedule()
        .issues(optimized.registry())
        .iter()
        .all(|i| i.kind != IssueKind::Conflict));
}

#[test]
fn constraints_from_toml_shape_the_slots() {
    let constraints = SchedulingConstraints::from_toml_str(
        r#"
        max_attempts = 100
        prefer_morning_sessions = false
        lunch_break_start = "11:00"
        lunch_break_end = "12:00"
        "#,
    )
    .unwrap();
    let mut s = Scheduler::new(constraints).unwrap().with_seed(21);

    let mut tt = department();
    s.generate(&mut tt, false).unwrap();
    let lunch = (hm(11, 0).unwrap(), hm(12, 0).unwrap());
    assert!(tt
        .schedule()
        .entries()
        .iter()
        .all(|e| !e.time_slot.overlaps_window(lunch.0, lunch.1)));
}

#[test]
fn suggestions_follow_the_current_schedule() {
    let mut tt = department();
    let mut s = scheduler(12);
    let before = s.suggestions(&tt, "CHEM101").unwrap();
    // T2 is away Monday morning
    assert_eq!(before.len(), 32);

    s.generate(&mut tt, false).unwrap();
    let after = s.suggestions(&tt, "CHEM101").unwrap();
    let expected = s
        .time_slots(&tt.week)
        .into_iter()
        .filter(|slot| !tt.schedule().is_slot_taken(slot))
        .filter(|slot| !(slot.day() == Weekday::Mon && slot.starts_before_noon()))
        .count();
    assert_eq!(after.len(), expected);
    assert!(after
        .iter()
        .all(|(slot, _)| !tt.schedule().is_slot_taken(slot)));
}
