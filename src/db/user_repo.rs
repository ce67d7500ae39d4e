// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::User};

// O repositório de usuários, responsável por todas as interações com a
// tabela 'users'. Usuários nunca são apagados fisicamente (tombstone em
// deleted_at); toda leitura filtra as linhas vivas.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Para chamadas fora de transação nos métodos genéricos sobre executor.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // Busca global por e-mail (o e-mail é único no sistema inteiro)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = $1 AND deleted_at IS NULL",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    /// Cria um novo usuário. Aceita um executor (pool ou transação) porque a
    /// aceitação de convite cria o usuário dentro da mesma transação que o
    /// vínculo e a atualização do convite.
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        email: &str,
        password_hash: &str,
        name: &str,
        phone: Option<&str>,
        cpf: Option<&str>,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name, phone, cpf)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(phone)
        .bind(cpf)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Converte violação de chave única em um erro mais amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("E-mail já cadastrado.".to_string());
                }
            }
            AppError::DatabaseError(e)
        })
    }

    /// Atualiza nome e telefone do próprio usuário (perfil).
    pub async fn update_profile(
        &self,
        id: Uuid,
        name: &str,
        phone: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, phone = $3, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    /// Troca o hash de senha. Única via legítima de mutação de senha.
    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Vincula (ou desvincula, com None) o usuário a uma unidade. Aceita um
    /// executor para rodar na mesma transação que o restante do vínculo.
    pub async fn set_unit<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        unit_id: Option<Uuid>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE users SET unit_id = $2, updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(unit_id)
        .execute(executor)
        .await?;
        Ok(())
    }
}
