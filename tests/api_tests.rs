mod common;

use axum::http::StatusCode;
use common::spawn_app;
use serde_json::json;

#[tokio::test]
async fn test_course_crud() {
    let app = spawn_app().await;
    let token = app.register("ada").await;

    let (status, body) = app.post("/api/courses", &token, json!({"name": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("name"));

    let (status, course) = app
        .post(
            "/api/courses",
            &token,
            json!({"name": "Algorithms", "color": "#ff0000"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(course["name"], "Algorithms");
    let id = course["id"].as_str().unwrap();

    let (status, updated) = app
        .put(
            &format!("/api/courses/{id}"),
            &token,
            json!({"name": "Algorithms II", "color": null}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Algorithms II");
    assert!(updated.get("color").is_none());

    let (_, list) = app.get("/api/courses", &token).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    assert_eq!(
        app.delete(&format!("/api/courses/{id}"), &token).await,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        app.delete(&format!("/api/courses/{id}"), &token).await,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_create_then_list_assignment() {
    let app = spawn_app().await;
    let token = app.register("ada").await;
    let course_id = app.create_course(&token, "Algorithms").await;

    let (status, created) = app
        .post(
            "/api/assignments",
            &token,
            json!({
                "title": "HW1",
                "deadline": "2024-05-01",
                "courseId": course_id,
                "tags": ["graphs"]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["completed"], false);

    let (status, list) = app.get("/api/assignments", &token).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);

    let hw1 = &list[0];
    assert_eq!(hw1["id"], created["id"]);
    assert_eq!(hw1["title"], "HW1");
    assert_eq!(hw1["courseId"], course_id.as_str());
    assert_eq!(hw1["completed"], false);
    assert_eq!(hw1["tags"], json!(["graphs"]));
    assert_eq!(hw1["tasks"], json!([]));
    assert_eq!(hw1["notes"], json!([]));
}

#[tokio::test]
async fn test_assignment_requires_owned_course() {
    let app = spawn_app().await;
    let ada = app.register("ada").await;
    let bob = app.register("bob").await;
    let bobs_course = app.create_course(&bob, "Bob's course").await;

    let (status, body) = app
        .post(
            "/api/assignments",
            &ada,
            json!({"title": "HW1", "deadline": "2024-05-01", "courseId": bobs_course}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Course not found");

    let (status, _) = app
        .post(
            "/api/assignments",
            &ada,
            json!({"title": "", "deadline": "2024-05-01", "courseId": bobs_course}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let own = app.create_course(&ada, "Mine").await;
    let assignment = app.create_assignment(&ada, &own, "HW1").await;
    let (status, _) = app
        .put(
            &format!("/api/assignments/{assignment}"),
            &ada,
            json!({"courseId": bobs_course}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_rejects_unknown_fields() {
    let app = spawn_app().await;
    let token = app.register("ada").await;
    let course = app.create_course(&token, "Algorithms").await;
    let id = app.create_assignment(&token, &course, "HW1").await;

    let (status, body) = app
        .put(
            &format!("/api/assignments/{id}"),
            &token,
            json!({"userId": "someone-else"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, updated) = app
        .put(
            &format!("/api/assignments/{id}"),
            &token,
            json!({"completed": true, "description": "read chapter 3"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["description"], "read chapter 3");
    assert_eq!(updated["title"], "HW1");
}

#[tokio::test]
async fn test_progress_scenario() {
    let app = spawn_app().await;
    let token = app.register("ada").await;
    let course = app.create_course(&token, "Algorithms").await;
    let hw1 = app.create_assignment(&token, &course, "HW1").await;

    let (_, progress) = app
        .get(&format!("/api/assignments/{hw1}/progress"), &token)
        .await;
    assert_eq!(progress["progress"], 0);

    let (status, first) = app
        .post(
            &format!("/api/assignments/{hw1}/tasks"),
            &token,
            json!({"headline": "Read"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["difficulty"], "easy");
    assert_eq!(first["status"], "to do");

    let (status, _) = app
        .post(
            &format!("/api/assignments/{hw1}/tasks"),
            &token,
            json!({"headline": "Solve", "difficulty": "hard", "status": "done"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, progress) = app
        .get(&format!("/api/assignments/{hw1}/progress"), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress["progress"], 50);

    let first_id = first["id"].as_str().unwrap();
    let (status, task) = app
        .put(
            &format!("/api/assignments/{hw1}/tasks/{first_id}"),
            &token,
            json!({"status": "done"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["status"], "done");
    assert_eq!(task["headline"], "Read");

    let (_, progress) = app
        .get(&format!("/api/assignments/{hw1}/progress"), &token)
        .await;
    assert_eq!(progress["progress"], 100);

    let (_, tasks) = app
        .get(&format!("/api/assignments/{hw1}/tasks"), &token)
        .await;
    let headlines: Vec<&str> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["headline"].as_str().unwrap())
        .collect();
    assert_eq!(headlines, ["Read", "Solve"]);
}

#[tokio::test]
async fn test_delete_missing_task_leaves_list_unchanged() {
    let app = spawn_app().await;
    let token = app.register("ada").await;
    let course = app.create_course(&token, "Algorithms").await;
    let hw1 = app.create_assignment(&token, &course, "HW1").await;

    app.post(
        &format!("/api/assignments/{hw1}/tasks"),
        &token,
        json!({"headline": "Read"}),
    )
    .await;

    let status = app
        .delete(&format!("/api/assignments/{hw1}/tasks/does-not-exist"), &token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, tasks) = app
        .get(&format!("/api/assignments/{hw1}/tasks"), &token)
        .await;
    assert_eq!(tasks.as_array().unwrap().len(), 1);

    let status = app
        .delete("/api/assignments/missing/tasks/whatever", &token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_assignment_notes_crud() {
    let app = spawn_app().await;
    let token = app.register("ada").await;
    let course = app.create_course(&token, "Algorithms").await;
    let hw1 = app.create_assignment(&token, &course, "HW1").await;

    let (status, note) = app
        .post(
            &format!("/api/assignments/{hw1}/notes"),
            &token,
            json!({"headline": "Hint", "body": "use DFS"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let note_id = note["id"].as_str().unwrap();

    let (status, updated) = app
        .put(
            &format!("/api/assignments/{hw1}/notes/{note_id}"),
            &token,
            json!({"body": "use BFS"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["headline"], "Hint");
    assert_eq!(updated["body"], "use BFS");

    let (_, list) = app.get("/api/assignments", &token).await;
    assert_eq!(list[0]["notes"][0]["body"], "use BFS");

    assert_eq!(
        app.delete(&format!("/api/assignments/{hw1}/notes/{note_id}"), &token)
            .await,
        StatusCode::NO_CONTENT
    );
    let (_, notes) = app
        .get(&format!("/api/assignments/{hw1}/notes"), &token)
        .await;
    assert_eq!(notes, json!([]));
}

#[tokio::test]
async fn test_ownership_is_not_leaked() {
    let app = spawn_app().await;
    let ada = app.register("ada").await;
    let bob = app.register("bob").await;

    let course = app.create_course(&ada, "Algorithms").await;
    let hw1 = app.create_assignment(&ada, &course, "HW1").await;
    let (_, task) = app
        .post(
            &format!("/api/assignments/{hw1}/tasks"),
            &ada,
            json!({"headline": "Read"}),
        )
        .await;
    let task_id = task["id"].as_str().unwrap();

    let (_, bobs_list) = app.get("/api/assignments", &bob).await;
    assert_eq!(bobs_list, json!([]));
    let (_, bobs_courses) = app.get("/api/courses", &bob).await;
    assert_eq!(bobs_courses, json!([]));

    // Foreign ids answer exactly like absent ones
    let (foreign_status, foreign_body) = app
        .get(&format!("/api/assignments/{hw1}/tasks"), &bob)
        .await;
    let (absent_status, absent_body) = app
        .get("/api/assignments/no-such-id/tasks", &bob)
        .await;
    assert_eq!(foreign_status, StatusCode::NOT_FOUND);
    assert_eq!(foreign_status, absent_status);
    assert_eq!(foreign_body, absent_body);

    let (status, _) = app
        .put(
            &format!("/api/assignments/{hw1}"),
            &bob,
            json!({"title": "pwned"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.delete(&format!("/api/assignments/{hw1}/tasks/{task_id}"), &bob)
            .await,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.delete(&format!("/api/assignments/{hw1}"), &bob).await,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.delete(&format!("/api/courses/{course}"), &bob).await,
        StatusCode::NOT_FOUND
    );

    let (_, adas_list) = app.get("/api/assignments", &ada).await;
    assert_eq!(adas_list[0]["title"], "HW1");
    assert_eq!(adas_list[0]["tasks"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_course_delete_cascades() {
    let app = spawn_app().await;
    let token = app.register("ada").await;
    let doomed = app.create_course(&token, "Doomed").await;
    let kept = app.create_course(&token, "Kept").await;

    let hw1 = app.create_assignment(&token, &doomed, "HW1").await;
    app.create_assignment(&token, &kept, "Essay").await;
    app.post(
        &format!("/api/assignments/{hw1}/tasks"),
        &token,
        json!({"headline": "Read"}),
    )
    .await;

    let (_, note) = app
        .post(
            "/api/notes",
            &token,
            json!({"content": "exam prep", "courseId": doomed, "assignmentId": hw1}),
        )
        .await;

    assert_eq!(
        app.delete(&format!("/api/courses/{doomed}"), &token).await,
        StatusCode::NO_CONTENT
    );

    let (_, assignments) = app.get("/api/assignments", &token).await;
    let titles: Vec<&str> = assignments
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Essay"]);

    let (status, _) = app
        .get(&format!("/api/assignments/{hw1}/tasks"), &token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, notes) = app.get("/api/notes", &token).await;
    let remaining = &notes.as_array().unwrap()[0];
    assert_eq!(remaining["id"], note["id"]);
    assert_eq!(remaining["content"], "exam prep");
    assert!(remaining.get("courseId").is_none());
    assert!(remaining.get("assignmentId").is_none());
}

#[tokio::test]
async fn test_assignment_delete_unlinks_notes() {
    let app = spawn_app().await;
    let token = app.register("ada").await;
    let course = app.create_course(&token, "Algorithms").await;
    let hw1 = app.create_assignment(&token, &course, "HW1").await;

    let (status, note) = app
        .post(
            "/api/notes",
            &token,
            json!({"content": "graph tips", "courseId": course, "assignmentId": hw1}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(note["assignmentId"], hw1.as_str());

    assert_eq!(
        app.delete(&format!("/api/assignments/{hw1}"), &token).await,
        StatusCode::NO_CONTENT
    );

    let (_, notes) = app.get("/api/notes", &token).await;
    let remaining = &notes.as_array().unwrap()[0];
    assert_eq!(remaining["id"], note["id"]);
    assert_eq!(remaining["courseId"], course.as_str());
    assert!(remaining.get("assignmentId").is_none());

    // Children cannot be attached to the removed assignment
    let (status, _) = app
        .post(
            &format!("/api/assignments/{hw1}/tasks"),
            &token,
            json!({"headline": "late"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .post(
            &format!("/api/assignments/{hw1}/notes"),
            &token,
            json!({"headline": "late", "body": ""}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Empty link ids clear the link on update just as they are ignored on create
    let id = note["id"].as_str().unwrap();
    let (status, updated) = app
        .put(
            &format!("/api/notes/{id}"),
            &token,
            json!({"courseId": "", "assignmentId": ""}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert!(updated.get("courseId").is_none());
    assert!(updated.get("assignmentId").is_none());
}

#[tokio::test]
async fn test_top_level_notes() {
    let app = spawn_app().await;
    let ada = app.register("ada").await;
    let bob = app.register("bob").await;
    let bobs_course = app.create_course(&bob, "Bob's").await;

    let (status, _) = app.post("/api/notes", &ada, json!({"content": " "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/api/notes",
            &ada,
            json!({"content": "hello", "courseId": bobs_course}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Course not found");

    let (status, note) = app
        .post(
            "/api/notes",
            &ada,
            json!({"content": "hello", "tags": ["misc"]}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(note.get("updatedAt").is_none());
    let id = note["id"].as_str().unwrap();

    let (status, updated) = app
        .put(&format!("/api/notes/{id}"), &ada, json!({"content": "hi"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["content"], "hi");
    assert_eq!(updated["tags"], json!(["misc"]));
    assert!(updated["updatedAt"].is_string());

    let (status, _) = app
        .put(&format!("/api/notes/{id}"), &bob, json!({"content": "x"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(
        app.delete(&format!("/api/notes/{id}"), &ada).await,
        StatusCode::NO_CONTENT
    );
    let (_, notes) = app.get("/api/notes", &ada).await;
    assert_eq!(notes, json!([]));
}
