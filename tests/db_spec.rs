use studydesk::db::Database;
use studydesk::models::*;
use speculate2::speculate;

fn create_test_subject(db: &Database, name: &str, color: Option<&str>) -> Subject {
    db.create_subject(CreateSubjectInput {
        name: name.to_string(),
        color: color.map(str::to_string),
    })
    .expect("Failed to create subject")
}

fn create_test_task(db: &Database, title: &str, due_date: Option<&str>) -> Task {
    db.create_task(CreateTaskInput {
        title: title.to_string(),
        due_date: due_date.map(str::to_string),
        ..Default::default()
    })
    .expect("Failed to create task")
}

fn create_test_mark(db: &Database, stars: i64) -> Mark {
    db.create_mark(CreateMarkInput {
        stars,
        ..Default::default()
    })
    .expect("Failed to create mark")
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "tasks" {
        describe "create_task" {
            it "creates a pending task with a 32 character hex id" {
                let task = create_test_task(&db, "Essay", Some("2024-06-01"));

                assert_eq!(task.title, "Essay");
                assert_eq!(task.status, TaskStatus::Pending);
                assert_eq!(task.id.len(), 32);
                assert!(task.id.chars().all(|c| c.is_ascii_hexdigit()));
                assert_eq!(db.count_tasks().unwrap(), 1);
            }

            it "snapshots the subject name and color" {
                let subject = create_test_subject(&db, "Chemistry", Some("#00ff00"));

                let task = db.create_task(CreateTaskInput {
                    title: "Lab report".to_string(),
                    subject_id: Some(subject.id.clone()),
                    priority: Some(Priority::High),
                    task_type: Some("homework".to_string()),
                    ..Default::default()
                }).expect("Failed to create task");

                assert_eq!(task.subject.as_deref(), Some("Chemistry"));
                assert_eq!(task.color.as_deref(), Some("#00ff00"));

                let stored = db.get_task(&task.id).unwrap().unwrap();
                assert_eq!(stored.subject, task.subject);
                assert_eq!(stored.color, task.color);
                assert_eq!(stored.priority, Some(Priority::High));
                assert_eq!(stored.task_type.as_deref(), Some("homework"));
            }

            it "falls back to General for an unknown subject" {
                let task = db.create_task(CreateTaskInput {
                    title: "Orphan".to_string(),
                    subject_id: Some("does-not-exist".to_string()),
                    ..Default::default()
                }).expect("Failed to create task");

                assert_eq!(task.subject.as_deref(), Some(DEFAULT_SUBJECT));
                assert_eq!(task.color.as_deref(), Some(UNRESOLVED_SUBJECT_COLOR));
            }

            it "stores malformed due dates verbatim" {
                let task = create_test_task(&db, "Someday", Some("next week"));
                let stored = db.get_task(&task.id).unwrap().unwrap();

                assert_eq!(stored.due_date.as_deref(), Some("next week"));
                assert!(stored.parsed_due_date().is_none());
            }

            it "keeps a missing priority missing" {
                let task = create_test_task(&db, "Plain", None);
                let stored = db.get_task(&task.id).unwrap().unwrap();

                assert!(stored.priority.is_none());
                assert_eq!(stored.priority_label(), "medium");
            }
        }

        describe "toggle_task_status" {
            it "completes a pending task" {
                let task = create_test_task(&db, "Essay", None);

                let status = db.toggle_task_status(&task.id).unwrap();
                assert_eq!(status, Some(TaskStatus::Completed));
                assert!(db.get_task(&task.id).unwrap().unwrap().is_completed());
            }

            it "returns to the original status when toggled twice" {
                let task = create_test_task(&db, "Essay", None);

                db.toggle_task_status(&task.id).unwrap();
                db.toggle_task_status(&task.id).unwrap();

                let stored = db.get_task(&task.id).unwrap().unwrap();
                assert_eq!(stored.status, TaskStatus::Pending);
            }

            it "is a no-op for an unknown id" {
                create_test_task(&db, "Essay", None);

                assert_eq!(db.toggle_task_status("missing").unwrap(), None);
                assert_eq!(db.count_completed_tasks().unwrap(), 0);
            }
        }

        describe "delete_task" {
            it "removes the task" {
                let task = create_test_task(&db, "Essay", None);

                assert!(db.delete_task(&task.id).unwrap());
                assert!(db.get_task(&task.id).unwrap().is_none());
            }

            it "is a no-op for an unknown id" {
                create_test_task(&db, "Essay", None);

                assert!(!db.delete_task("missing").unwrap());
                assert_eq!(db.count_tasks().unwrap(), 1);
            }
        }

        describe "get_tasks_by_due_date" {
            it "orders by due date with undated tasks first" {
                create_test_task(&db, "June", Some("2024-06-01"));
                create_test_task(&db, "Undated", None);
                create_test_task(&db, "March", Some("2024-03-01"));

                let titles: Vec<String> = db.get_tasks_by_due_date().unwrap()
                    .into_iter().map(|t| t.title).collect();
                assert_eq!(titles, vec!["Undated", "March", "June"]);
            }
        }

        describe "get_all_tasks" {
            it "returns tasks in insertion order" {
                create_test_task(&db, "First", Some("2024-06-01"));
                create_test_task(&db, "Second", Some("2024-01-01"));

                let titles: Vec<String> = db.get_all_tasks().unwrap()
                    .into_iter().map(|t| t.title).collect();
                assert_eq!(titles, vec!["First", "Second"]);
            }
        }

        describe "count_completed_tasks" {
            it "counts only completed tasks regardless of due date" {
                let a = create_test_task(&db, "A", Some("1999-01-01"));
                let b = create_test_task(&db, "B", None);
                create_test_task(&db, "C", Some("2999-01-01"));

                db.toggle_task_status(&a.id).unwrap();
                db.toggle_task_status(&b.id).unwrap();

                assert_eq!(db.count_completed_tasks().unwrap(), 2);
                assert_eq!(db.count_tasks().unwrap(), 3);
            }
        }
    }

    describe "subjects" {
        it "lists subjects in creation order" {
            create_test_subject(&db, "Maths", Some("#f00"));
            create_test_subject(&db, "Art", None);

            let names: Vec<String> = db.get_all_subjects().unwrap()
                .into_iter().map(|s| s.name).collect();
            assert_eq!(names, vec!["Maths", "Art"]);
        }

        it "does not cascade deletes to tasks" {
            let subject = create_test_subject(&db, "History", Some("#abcdef"));
            let task = db.create_task(CreateTaskInput {
                title: "Timeline".to_string(),
                subject_id: Some(subject.id.clone()),
                ..Default::default()
            }).unwrap();

            assert!(db.delete_subject(&subject.id).unwrap());

            let stored = db.get_task(&task.id).unwrap().unwrap();
            assert_eq!(stored.subject.as_deref(), Some("History"));
            assert_eq!(stored.color.as_deref(), Some("#abcdef"));
        }

        it "ignores deletes of unknown ids" {
            create_test_subject(&db, "Maths", None);
            assert!(!db.delete_subject("missing").unwrap());
            assert_eq!(db.get_all_subjects().unwrap().len(), 1);
        }
    }

    describe "marks" {
        it "snapshots the subject name" {
            let subject = create_test_subject(&db, "Physics", None);
            let mark = db.create_mark(CreateMarkInput {
                subject_id: Some(subject.id.clone()),
                score: Some("18".to_string()),
                total: Some("20".to_string()),
                remarks: Some("Great".to_string()),
                stars: 3,
            }).unwrap();

            db.delete_subject(&subject.id).unwrap();

            let marks = db.get_marks_newest_first().unwrap();
            assert_eq!(marks.len(), 1);
            assert_eq!(marks[0].id, mark.id);
            assert_eq!(marks[0].subject, "Physics");
            assert_eq!(marks[0].score.as_deref(), Some("18"));
        }

        it "falls back to General without a subject" {
            let mark = create_test_mark(&db, 0);
            assert_eq!(mark.subject, DEFAULT_SUBJECT);
        }

        it "lists the newest mark first" {
            let first = create_test_mark(&db, 1);
            let second = create_test_mark(&db, 2);

            let ids: Vec<String> = db.get_marks_newest_first().unwrap()
                .into_iter().map(|m| m.id).collect();
            assert_eq!(ids, vec![second.id, first.id]);
        }

        describe "sum_mark_stars" {
            it "is zero without marks" {
                assert_eq!(db.sum_mark_stars().unwrap(), 0);
            }

            it "sums stars across every mark" {
                create_test_mark(&db, 2);
                create_test_mark(&db, 5);
                create_test_mark(&db, 0);

                assert_eq!(db.sum_mark_stars().unwrap(), 7);
            }
        }
    }

    describe "notes" {
        it "lists the newest note first" {
            db.create_note(CreateNoteInput {
                title: Some("Older".to_string()),
                content: Some("a".to_string()),
            }).unwrap();
            db.create_note(CreateNoteInput {
                title: Some("Newer".to_string()),
                content: None,
            }).unwrap();

            let titles: Vec<String> = db.get_notes_newest_first().unwrap()
                .into_iter().map(|n| n.title_text().to_string()).collect();
            assert_eq!(titles, vec!["Newer", "Older"]);
        }
    }

    describe "rewards" {
        it "stores name and cost" {
            let reward = db.create_reward(CreateRewardInput {
                name: Some("Movie night".to_string()),
                cost: 20,
            }).unwrap();

            assert_eq!(db.get_all_rewards().unwrap(), vec![reward]);
        }
    }

    describe "delete_from" {
        it "deletes from the named collection only" {
            let note = db.create_note(CreateNoteInput::default()).unwrap();
            let mark = create_test_mark(&db, 1);

            assert!(db.delete_from(DeletableCollection::Notes, &note.id).unwrap());
            assert!(!db.delete_from(DeletableCollection::Notes, &mark.id).unwrap());

            assert_eq!(db.count(DeletableCollection::Notes).unwrap(), 0);
            assert_eq!(db.count(DeletableCollection::Marks).unwrap(), 1);
        }

        it "is a no-op for an unknown id" {
            db.create_reward(CreateRewardInput { name: None, cost: 5 }).unwrap();

            assert!(!db.delete_from(DeletableCollection::Rewards, "missing").unwrap());
            assert_eq!(db.count(DeletableCollection::Rewards).unwrap(), 1);
        }
    }

    describe "open" {
        it "creates the parent directory and persists across reopen" {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("studydesk.db");

            {
                let on_disk = Database::open(path.clone()).unwrap();
                on_disk.migrate().unwrap();
                create_test_task(&on_disk, "Persisted", None);
            }

            let reopened = Database::open(path).unwrap();
            reopened.migrate().unwrap();
            assert_eq!(reopened.count_tasks().unwrap(), 1);
        }
    }
}
