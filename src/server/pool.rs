//! # Pool de Workers
//! src/server/pool.rs
//!
//! Implementa el pool de tamaño fijo que ejecuta las conexiones aceptadas.
//!
//! La cola de tareas no tiene límite: encolar nunca bloquea al hilo que
//! acepta conexiones. Cuando todos los workers están ocupados las tareas
//! esperan en la cola en orden FIFO.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;

/// Unidad de trabajo que ejecuta el pool
type Task = Box<dyn FnOnce() + Send + 'static>;

/// Cola compartida entre el hilo que acepta y los workers
struct TaskQueue {
    /// Tareas pendientes en orden FIFO
    tasks: Mutex<VecDeque<Task>>,

    /// Condvar para despertar workers cuando llegan tareas
    available: Condvar,
}

/// Pool de workers de tamaño fijo
///
/// Los threads se crean una sola vez al construir el pool y viven hasta que
/// el proceso termina. Un panic dentro de una tarea no mata al worker: se
/// reporta y el worker sigue con la siguiente tarea, así el pool nunca se
/// achica.
pub struct WorkerPool {
    queue: Arc<TaskQueue>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl WorkerPool {
    /// Crea el pool y arranca `size` workers.
    ///
    /// # Panics
    ///
    /// Paniquea si `size` es 0 (la configuración lo valida antes).
    pub fn new(size: usize) -> Self {
        assert!(size > 0);

        let queue = Arc::new(TaskQueue {
            tasks: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        });

        let mut workers = Vec::with_capacity(size);
        for i in 0..size {
            let queue = Arc::clone(&queue);
            let name = format!("worker-{}", i);

            workers.push(thread::spawn(move || Self::worker_loop(name, queue)));
        }

        Self { queue, workers }
    }

    /// Encola una tarea. Nunca bloquea.
    pub fn execute<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut tasks = self.queue.tasks.lock().unwrap();
        tasks.push_back(Box::new(task));

        // Despertar a un worker esperando
        self.queue.available.notify_one();
    }

    /// Cantidad de workers del pool
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Cantidad de tareas esperando en la cola (sin contar las que ya
    /// están ejecutándose)
    pub fn pending(&self) -> usize {
        self.queue.tasks.lock().unwrap().len()
    }

    /// Loop principal de cada worker: desencolar, ejecutar, repetir
    fn worker_loop(name: String, queue: Arc<TaskQueue>) {
        loop {
            let task = Self::dequeue(&queue);

            let result = panic::catch_unwind(AssertUnwindSafe(move || task()));
            if result.is_err() {
                eprintln!("   💥 [{}] Una tarea terminó en panic, el worker continúa", name);
            }
        }
    }

    /// Saca la próxima tarea, bloqueando hasta que haya una
    fn dequeue(queue: &TaskQueue) -> Task {
        let mut tasks = queue.tasks.lock().unwrap();

        loop {
            if let Some(task) = tasks.pop_front() {
                return task;
            }

            // Esperar a que encolen algo
            tasks = queue.available.wait(tasks).unwrap();
        }
    }
}
