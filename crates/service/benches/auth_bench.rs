use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::auth::service::{AuthService, AuthConfig};
use service::auth::repository::mock::MockAuthRepository;
use service::auth::domain::{RegisterInput, LoginInput};

fn bench_login(c: &mut Criterion) {
    let repo = Arc::new(MockAuthRepository::default());
    let svc = AuthService::new(repo.clone(), AuthConfig::new("bench-secret-0123456789", 12));

    // pre-create user outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    let _ = rt.block_on(svc.register(RegisterInput { email: "bench@example.com".into(), name: "Bench".into(), password: "Benchmark1".into(), phone: None }));

    c.bench_function("auth_login_verify", |b| {
        b.iter(|| {
            let _ = rt.block_on(svc.login(LoginInput { email: "bench@example.com".into(), password: "Benchmark1".into() })).unwrap();
        });
    });
}

fn bench_token_verify(c: &mut Criterion) {
    let repo = Arc::new(MockAuthRepository::default());
    let svc = AuthService::new(repo, AuthConfig::new("bench-secret-0123456789", 12));
    let rt = tokio::runtime::Runtime::new().unwrap();
    let user = rt
        .block_on(svc.register(RegisterInput { email: "bench@example.com".into(), name: "Bench".into(), password: "Benchmark1".into(), phone: None }))
        .unwrap();
    let (token, _) = svc.issue_token(&user).unwrap();

    c.bench_function("auth_token_verify", |b| {
        b.iter(|| svc.verify_token(&token).unwrap());
    });
}

criterion_group!(benches, bench_login, bench_token_verify);
criterion_main!(benches);
